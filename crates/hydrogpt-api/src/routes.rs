//! Router and middleware assembly

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router with CORS and request tracing
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/query", post(handlers::process_query))
        .route("/api/default-map-data", get(handlers::default_map_data))
        .route("/api/water-points", get(handlers::water_points))
        .route("/api/debug/tables", get(handlers::debug_tables))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Permit the configured origins; "*" or an empty list permits any caller
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
