//! API request handlers
//!
//! One convention for data-layer degradation across every endpoint: the
//! response is always 2xx and the failure is reported in-band, as an
//! `error` field on the geo endpoints and inside `text_response` on the
//! query endpoint. The front end inspects bodies, not status codes.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use hydrogpt_core::{FeatureCollection, QueryRequest};
use serde_json::{json, Value};
use std::sync::Arc;

/// Service identity and dependency status
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "HydroGPT API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ready",
        "database_connected": state.database_connected(),
        "llm_configured": state.llm_configured(),
        "endpoints": [
            "/api/query - Process natural language queries",
            "/api/default-map-data - Get sublocation map data",
            "/api/water-points - Get water point locations",
            "/api/debug/tables - Check database tables",
        ],
    }))
}

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "HydroGPT"}))
}

/// Process a natural-language query through the pipeline
pub async fn process_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<Value> {
    tracing::info!(user_id = %req.user_id, query_chars = req.query.len(), "query received");
    Json(state.pipeline.process(&req.query).await)
}

/// Sublocation feature collection with accessibility properties
pub async fn default_map_data(State(state): State<Arc<AppState>>) -> Response {
    let Some(store) = state.store() else {
        return error_body("Database not connected");
    };

    let collection = match store.fetch_map_areas().await {
        Ok(rows) => FeatureCollection::from_areas(rows),
        Err(e) => Err(e),
    };

    match collection {
        Ok(fc) => Json(fc).into_response(),
        Err(e) => error_body(e.to_string()),
    }
}

/// Water point feature collection
pub async fn water_points(State(state): State<Arc<AppState>>) -> Response {
    let Some(store) = state.store() else {
        return error_body("Database not connected");
    };

    let collection = match store.fetch_water_points().await {
        Ok(rows) => FeatureCollection::from_water_points(rows),
        Err(e) => Err(e),
    };

    match collection {
        Ok(fc) => Json(fc).into_response(),
        Err(e) => error_body(e.to_string()),
    }
}

/// Diagnostic table counts
pub async fn debug_tables(State(state): State<Arc<AppState>>) -> Response {
    let Some(store) = state.store() else {
        return error_body("Database not connected");
    };

    match store.fetch_table_diagnostics().await {
        Ok(diag) => Json(diag).into_response(),
        Err(e) => error_body(e.to_string()),
    }
}

fn error_body(message: impl Into<String>) -> Response {
    Json(json!({"error": message.into()})).into_response()
}
