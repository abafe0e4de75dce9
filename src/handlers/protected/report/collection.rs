use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::store::Row;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::report::{ReportParams, ReportResponse, Reportable};
use crate::services::BatchOutcome;

/// GET /api/v1/{slug} - paginated, filtered listing
pub async fn list<R: Reportable>(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<ReportResponse> {
    let params = ReportParams::from_query(pairs)?;
    let response = state.reports.run::<R>(&params).await?;
    Ok(ApiResponse::success(response))
}

/// POST /api/v1/{slug} - create one record; submitter fields come from the token
pub async fn create<R: Reportable>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Row> {
    let Json(payload) = payload?;
    let row = state.records.create(R::SCHEMA, payload, &user.identity()).await?;
    Ok(ApiResponse::created(row))
}

/// POST /api/v1/{slug}/batch - offline sync; ids already stored are skipped
pub async fn batch<R: Reportable>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<BatchOutcome> {
    let Json(payload) = payload?;
    let outcome = state.records.batch_create(R::SCHEMA, payload, &user.identity()).await?;
    Ok(ApiResponse::success(outcome))
}
