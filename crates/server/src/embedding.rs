//! Query embedding client.
//!
//! The embedding provider is opaque: text in, vector out. Failures are
//! recoverable; retrieval degrades to lexical-only search.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Transport(String),

    #[error("embedding service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("embedding response contained no vectors")]
    Empty,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    #[tracing::instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: [&'a str; 1],
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            data: Vec<EmbeddingRow>,
        }

        #[derive(Deserialize)]
        struct EmbeddingRow {
            embedding: Vec<f32>,
        }

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: [text],
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: normalize_error_body(&body),
            });
        }

        let response = response
            .json::<EmbedResponse>()
            .await
            .map_err(|e| EmbeddingError::Transport(format!("failed to decode response: {e}")))?;

        response
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .ok_or(EmbeddingError::Empty)
    }
}

fn normalize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    trimmed.to_string()
}
