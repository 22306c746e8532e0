use serde::{Deserialize, Serialize};

use crate::calculation::{CalculateSentenceRequest, CalculateSentenceResponse};
use crate::offence::GuidelineChunk;

/// Request body for `/search_guidelines`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchGuidelinesRequest {
    pub query: String,
    #[serde(default)]
    pub offence_id: Option<String>,
    /// Clamped to 1..=20; falls back to the service default when absent.
    #[serde(default)]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchGuidelinesResponse {
    pub results: Vec<GuidelineChunk>,
}

/// Request body for `/chat_turn`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatTurnRequest {
    pub message: String,
    #[serde(default)]
    pub offence_id: Option<String>,
    #[serde(default)]
    pub offence_query: Option<String>,
    /// Optional calculation sub-request; inherits the outer offence
    /// context when it names no offence of its own.
    #[serde(default)]
    pub calculation: Option<CalculateSentenceRequest>,
    #[serde(default)]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatTurnResponse {
    pub reply: String,
    pub calculation: Option<CalculateSentenceResponse>,
    #[serde(default)]
    pub citations: Vec<GuidelineChunk>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_top_k_defaults_to_none() {
        let req: SearchGuidelinesRequest =
            serde_json::from_value(serde_json::json!({"query": "assault"})).unwrap();
        assert_eq!(req.top_k, None);
        assert_eq!(req.offence_id, None);
    }

    #[test]
    fn chat_request_without_calculation() {
        let req: ChatTurnRequest =
            serde_json::from_value(serde_json::json!({"message": "what is the range?"})).unwrap();
        assert!(req.calculation.is_none());
        assert!(req.offence_query.is_none());
    }
}
