use std::sync::Arc;

use crate::retrieval::RetrievalService;
use crate::store::GuidelineStore;

/// Shared application state passed to axum handlers via `State`.
/// Both handles are process-global, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GuidelineStore>,
    pub retrieval: Arc<RetrievalService>,
}
