//! NudgeWealth Server - HTTP API over the transaction evaluation engine
//!
//! Endpoints:
//!
//! - `GET  /health`
//! - `GET  /api/transactions`, `POST /api/transactions`, `GET /api/transactions/:id`
//! - `GET  /api/rules`, `POST /api/rules`, `PATCH /api/rules/:id`, `DELETE /api/rules/:id`
//! - `POST /api/rules/reconcile`
//! - `GET  /api/analytics/{overview,trend,breakdown,spending}`
//! - `GET  /api/investment-options`
//! - `GET  /api/events` (server-sent store events)

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::{AppState, Engine};

use config::ApiSettings;

/// Build the application router
pub fn create_router(state: Arc<AppState>, api: &ApiSettings) -> Router {
    let api_routes = Router::new()
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::submit_transaction),
        )
        .route("/transactions/:id", get(handlers::get_transaction))
        .route(
            "/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route("/rules/reconcile", post(handlers::reconcile_rules))
        .route(
            "/rules/:id",
            patch(handlers::update_rule).delete(handlers::delete_rule),
        )
        .route("/analytics/overview", get(handlers::overview))
        .route("/analytics/trend", get(handlers::trend))
        .route("/analytics/breakdown", get(handlers::breakdown))
        .route("/analytics/spending", get(handlers::spending))
        .route("/investment-options", get(handlers::investment_options))
        .route("/events", get(handlers::events));

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state);

    if api.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if api.enable_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}
