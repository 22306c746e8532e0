use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use shared_types::{AppError, ErrorBody, SearchGuidelinesResponse};

use crate::state::AppState;
use crate::validate;

use super::rejection_to_error;

/// POST /search_guidelines
#[utoipa::path(
    post,
    path = "/search_guidelines",
    request_body = shared_types::SearchGuidelinesRequest,
    responses(
        (status = 200, description = "Ranked guideline chunks", body = SearchGuidelinesResponse),
        (status = 400, description = "Unparseable request body", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "retrieval"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn search_guidelines(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchGuidelinesResponse>, AppError> {
    let Json(body) = payload.map_err(rejection_to_error)?;
    let request = validate::parse_search_request(&body).map_err(AppError::validation)?;
    let results = state
        .retrieval
        .search(&request.query, request.offence_id.as_deref(), request.top_k)
        .await?;
    Ok(Json(SearchGuidelinesResponse { results }))
}
