use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use shared_types::{AppError, ChatTurnResponse, ErrorBody};

use crate::state::AppState;
use crate::{chat, validate};

use super::rejection_to_error;

/// POST /chat_turn
#[utoipa::path(
    post,
    path = "/chat_turn",
    request_body = shared_types::ChatTurnRequest,
    responses(
        (status = 200, description = "Chat reply with citations", body = ChatTurnResponse),
        (status = 400, description = "Unparseable request body", body = ErrorBody),
        (status = 404, description = "Offence not found", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "chat"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn chat_turn(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatTurnResponse>, AppError> {
    let Json(body) = payload.map_err(rejection_to_error)?;
    let request = validate::parse_chat_request(&body).map_err(AppError::validation)?;
    let response = chat::chat_turn(state.store.clone(), &state.retrieval, request).await?;
    Ok(Json(response))
}
