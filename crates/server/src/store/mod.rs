//! Guideline store contract.
//!
//! The persistent store is remote and exposes a fixed set of RPCs; the
//! trait keeps orchestrators injectable so the rules engine stays pure
//! and tests can run against an in-memory implementation.

mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use shared_types::{AppError, GuidelineChunk, OffenceRecord, SentencingMatrixRow};
use thiserror::Error;

pub use supabase::SupabaseStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected an identifier it could not parse (e.g. a
    /// malformed UUID). Surfaces to the client as a 422.
    #[error("{0}")]
    MalformedId(String),

    /// The request never completed (connection, timeout, decode).
    #[error("store request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("store rejected request ({status}): {message}")]
    Api { status: u16, message: String },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedId(message) => AppError::unprocessable(message),
            StoreError::Transport(message) => AppError::store(message),
            StoreError::Api { message, .. } => AppError::store(message),
        }
    }
}

/// The six RPCs the store exposes.
#[async_trait]
pub trait GuidelineStore: Send + Sync {
    async fn fetch_offence_by_id(&self, offence_id: &str)
        -> Result<Option<OffenceRecord>, StoreError>;

    /// Trigram-similarity search over canonical name, short name and
    /// provision; rows ordered by score descending, then canonical name.
    async fn search_offences(&self, query: &str, limit: u32)
        -> Result<Vec<OffenceRecord>, StoreError>;

    async fn fetch_sentencing_matrix(
        &self,
        offence_id: &str,
    ) -> Result<Vec<SentencingMatrixRow>, StoreError>;

    async fn search_chunks_text(
        &self,
        query: &str,
        top_k: u32,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError>;

    async fn search_chunks_hybrid(
        &self,
        query: &str,
        embedding: &[f32],
        top_k: u32,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError>;

    async fn store_calculation_audit(
        &self,
        offence_id: &str,
        request_payload: &Value,
        result_payload: &Value,
    ) -> Result<(), StoreError>;
}
