use utoipa::OpenApi;

/// Aggregated OpenAPI document for the four routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sentencing Calculation & Retrieval Service",
        description = "Deterministic sentencing calculations with hybrid guideline retrieval"
    ),
    paths(
        crate::health::health_check,
        crate::rest::calculate::calculate_sentence,
        crate::rest::guidelines::search_guidelines,
        crate::rest::chat_turn::chat_turn,
    ),
    components(schemas(
        crate::health::HealthResponse,
        shared_types::ErrorBody,
        shared_types::ValidationIssue,
        shared_types::PleaStage,
        shared_types::SentenceType,
        shared_types::OffenceRecord,
        shared_types::SentencingMatrixRow,
        shared_types::GuidelineChunk,
        shared_types::SentencingRange,
        shared_types::CalculateSentenceRequest,
        shared_types::CalculateSentenceResponse,
        shared_types::SearchGuidelinesRequest,
        shared_types::SearchGuidelinesResponse,
        shared_types::ChatTurnRequest,
        shared_types::ChatTurnResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "calculation", description = "Sentencing calculation"),
        (name = "retrieval", description = "Guideline retrieval"),
        (name = "chat", description = "Chat turns"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for route in ["/health", "/calculate_sentence", "/search_guidelines", "/chat_turn"] {
            assert!(paths.iter().any(|p| p == route), "missing route {route}");
        }
    }
}
