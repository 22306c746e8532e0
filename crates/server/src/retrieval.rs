//! Hybrid guideline retrieval.
//!
//! Vector + lexical fusion when an embedder is configured and vector
//! search is enabled; lexical-only otherwise. An embedding failure never
//! fails the request; it silently degrades to lexical search.

use std::sync::Arc;

use shared_types::{AppError, GuidelineChunk};

use crate::embedding::Embedder;
use crate::store::GuidelineStore;

pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 20;

#[derive(Clone)]
pub struct RetrievalService {
    store: Arc<dyn GuidelineStore>,
    embedder: Option<Arc<dyn Embedder>>,
    default_top_k: u32,
    vector_search_enabled: bool,
}

impl RetrievalService {
    pub fn new(
        store: Arc<dyn GuidelineStore>,
        embedder: Option<Arc<dyn Embedder>>,
        default_top_k: u32,
        vector_search_enabled: bool,
    ) -> Self {
        Self {
            store,
            embedder,
            default_top_k,
            vector_search_enabled,
        }
    }

    /// Retrieve guideline chunks for a query, optionally filtered to one
    /// offence (its own chunks plus chunks of linked guidelines).
    pub async fn search(
        &self,
        query: &str,
        offence_id: Option<&str>,
        top_k: Option<u32>,
    ) -> Result<Vec<GuidelineChunk>, AppError> {
        let k = top_k.unwrap_or(self.default_top_k).clamp(MIN_TOP_K, MAX_TOP_K);

        if self.vector_search_enabled {
            if let Some(embedder) = &self.embedder {
                match embedder.embed(query).await {
                    Ok(embedding) => {
                        let rows = self
                            .store
                            .search_chunks_hybrid(query, &embedding, k, offence_id)
                            .await?;
                        return Ok(rows);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "embedding failed; falling back to lexical retrieval");
                    }
                }
            }
        }

        Ok(self.store.search_chunks_text(query, k, offence_id).await?)
    }
}
