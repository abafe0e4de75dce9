use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::store::Row;
use crate::middleware::{ApiResponse, ApiResult};
use crate::report::Reportable;

/// GET /api/v1/{slug}/:id
pub async fn get<R: Reportable>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Row> {
    let row = state.records.get(R::SCHEMA, &id).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /api/v1/{slug}/:id - only the supplied fields change
pub async fn update<R: Reportable>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Row> {
    let Json(payload) = payload?;
    let row = state.records.update(R::SCHEMA, &id, payload).await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/v1/{slug}/:id
pub async fn delete<R: Reportable>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.records.delete(R::SCHEMA, &id).await?;
    Ok(ApiResponse::no_content())
}
