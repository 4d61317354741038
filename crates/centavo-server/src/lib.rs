//! Centavo Web Server
//!
//! Axum-based REST API exposing the financial report endpoints.
//!
//! The server is a thin shell around [`centavo_core::ReportService`]: query
//! parameters in, JSON report out. Validation failures surface as 400s with
//! an `{"error": msg}` body; record store failures become sanitized 500s
//! that never leak query internals.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use centavo_core::dates::Clock;
use centavo_core::db::Database;
use centavo_core::ReportService;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub reports: ReportService,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_service(ReportService::new(db), static_dir, config)
}

/// Create the application router with an explicit clock (for testing
/// "now"-relative report windows)
pub fn create_router_with_clock(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> Router {
    create_router_with_service(ReportService::with_clock(db, clock), static_dir, config)
}

fn create_router_with_service(
    reports: ReportService,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState { reports });

    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Reports
        .route("/reports/balance", get(handlers::report_balance))
        .route(
            "/reports/expenses-by-category",
            get(handlers::report_expenses_by_category),
        )
        .route(
            "/reports/monthly-expenses",
            get(handlers::report_monthly_expenses),
        )
        .route(
            "/reports/periodic-balance",
            get(handlers::report_periodic_balance),
        )
        .route(
            "/reports/top-categories",
            get(handlers::report_top_categories),
        )
        .route(
            "/reports/spending-patterns",
            get(handlers::report_spending_patterns),
        )
        .route("/reports/forecast", get(handlers::report_forecast));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map an engine error: validation failures keep their message and get a
    /// 400; anything else is logged and returned as a generic 500.
    pub fn from_engine(err: centavo_core::Error) -> Self {
        match err {
            centavo_core::Error::Validation(msg) => Self::bad_request(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests;
