//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `reports` - Report generation commands
//! - `serve` - Web server command

pub mod core;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;
