// handlers/public/mod.rs - endpoints served without authentication

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models;

/// GET / - service description and the registered report routes
pub async fn root() -> Json<Value> {
    let reports: Vec<String> = models::ALL
        .iter()
        .map(|schema| format!("/api/v1/{}", schema.slug))
        .collect();

    Json(json!({
        "name": "FieldOps API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Field reporting backend for site engineers",
        "endpoints": {
            "health": "/health (public)",
            "token": "/api/v1/token (protected)",
            "reports": reports,
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "connected" })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
