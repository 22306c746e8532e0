pub mod calculate;
pub mod chat_turn;
pub mod guidelines;

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::Router;
use shared_types::AppError;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(crate::health::health_check))
        .route("/calculate_sentence", post(calculate::calculate_sentence))
        .route("/search_guidelines", post(guidelines::search_guidelines))
        .route("/chat_turn", post(chat_turn::chat_turn))
}

/// Map body-extraction failures to the error envelope: anything that
/// never produced a JSON value is a 400.
pub(crate) fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonSyntaxError(_) => AppError::bad_request("Invalid JSON body"),
        JsonRejection::JsonDataError(e) => AppError::bad_request(e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Expected request with Content-Type: application/json")
        }
        other => AppError::bad_request(other.body_text()),
    }
}
