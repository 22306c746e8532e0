use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use shared_types::{AppError, CalculateSentenceResponse, ErrorBody};

use crate::state::AppState;
use crate::{calculator, validate};

use super::rejection_to_error;

/// POST /calculate_sentence
#[utoipa::path(
    post,
    path = "/calculate_sentence",
    request_body = shared_types::CalculateSentenceRequest,
    responses(
        (status = 200, description = "Sentencing outcome", body = CalculateSentenceResponse),
        (status = 400, description = "Unparseable request body", body = ErrorBody),
        (status = 404, description = "Offence not found", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "calculation"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn calculate_sentence(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CalculateSentenceResponse>, AppError> {
    let Json(body) = payload.map_err(rejection_to_error)?;
    let request = validate::parse_calculate_request(&body, &[], true).map_err(AppError::validation)?;
    let response = calculator::run(state.store.clone(), &request).await?;
    Ok(Json(response))
}
