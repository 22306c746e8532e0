//! Supabase-backed store client.
//!
//! Every store operation is a PostgREST RPC: a POST to
//! `{base}/rest/v1/rpc/{function}` authenticated with the service-role
//! key. Error bodies are JSON `{code, message, ...}`; Postgres code
//! 22P02 (invalid text representation) marks a malformed identifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared_types::{GuidelineChunk, OffenceRecord, SentencingMatrixRow};

use super::{GuidelineStore, StoreError};

/// Postgres error code for invalid text representation (bad uuid casts).
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            service_role_key: service_role_key.into(),
        }
    }

    async fn rpc_raw(&self, function: &str, params: Value) -> Result<reqwest::Response, StoreError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&params)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("rpc {function}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = parse_error_body(&body);
        if code.as_deref() == Some(INVALID_TEXT_REPRESENTATION) {
            return Err(StoreError::MalformedId(message));
        }
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn rpc<T: DeserializeOwned>(&self, function: &str, params: Value) -> Result<T, StoreError> {
        let response = self.rpc_raw(function, params).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Transport(format!("failed to decode {function} response: {e}")))
    }
}

/// Pull `(code, message)` out of a PostgREST error body, falling back to
/// the raw text when it is not the expected JSON shape.
fn parse_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "<empty error body>".to_string());
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let code = value
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return (code, message.to_string());
        }
        return (code, trimmed.to_string());
    }
    (None, trimmed.to_string())
}

#[async_trait]
impl GuidelineStore for SupabaseStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_offence_by_id(
        &self,
        offence_id: &str,
    ) -> Result<Option<OffenceRecord>, StoreError> {
        let rows: Vec<OffenceRecord> = self
            .rpc("fetch_offence_by_id", json!({ "offence_id": offence_id }))
            .await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(skip(self))]
    async fn search_offences(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<OffenceRecord>, StoreError> {
        self.rpc("search_offences", json!({ "query": query, "limit": limit }))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_sentencing_matrix(
        &self,
        offence_id: &str,
    ) -> Result<Vec<SentencingMatrixRow>, StoreError> {
        self.rpc("fetch_sentencing_matrix", json!({ "offence_id": offence_id }))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn search_chunks_text(
        &self,
        query: &str,
        top_k: u32,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        self.rpc(
            "search_chunks_text",
            json!({ "query": query, "top_k": top_k, "offence_id": offence_id }),
        )
        .await
    }

    #[tracing::instrument(skip(self, embedding))]
    async fn search_chunks_hybrid(
        &self,
        query: &str,
        embedding: &[f32],
        top_k: u32,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        self.rpc(
            "search_chunks_hybrid",
            json!({
                "query": query,
                "embedding": embedding,
                "top_k": top_k,
                "offence_id": offence_id,
            }),
        )
        .await
    }

    #[tracing::instrument(skip(self, request_payload, result_payload))]
    async fn store_calculation_audit(
        &self,
        offence_id: &str,
        request_payload: &Value,
        result_payload: &Value,
    ) -> Result<(), StoreError> {
        self.rpc_raw(
            "store_calculation_audit",
            json!({
                "offence_id": offence_id,
                "request_payload": request_payload,
                "result_payload": result_payload,
            }),
        )
        .await?;
        Ok(())
    }
}
