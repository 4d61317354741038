//! HTTP request handlers
//!
//! One submodule per API area; everything is re-exported for the router.

pub mod health;
pub mod reports;

pub use health::*;
pub use reports::*;
