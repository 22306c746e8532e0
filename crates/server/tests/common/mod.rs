//! Shared test fixtures: an in-memory store implementing the RPC
//! contract, embedder stand-ins, and request helpers for driving the
//! router without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::embedding::{Embedder, EmbeddingError};
use server::retrieval::RetrievalService;
use server::state::AppState;
use server::store::{GuidelineStore, StoreError};
use shared_types::{GuidelineChunk, OffenceRecord, SentencingMatrixRow};

pub const COMMON_ASSAULT_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const BURGLARY_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const MANSLAUGHTER_ID: &str = "33333333-3333-3333-3333-333333333333";
pub const WEAPON_ID: &str = "44444444-4444-4444-4444-444444444444";

#[derive(Default)]
pub struct InMemoryStore {
    pub offences: Vec<OffenceRecord>,
    pub matrix: HashMap<String, Vec<SentencingMatrixRow>>,
    pub chunks: Vec<GuidelineChunk>,
    /// offence_id -> guideline ids linked to that offence.
    pub links: HashMap<String, Vec<String>>,
    pub audits: Mutex<Vec<(String, Value, Value)>>,
    pub fail_audit: bool,
}

impl InMemoryStore {
    pub fn with_catalog() -> Self {
        Self {
            offences: vec![
                offence(COMMON_ASSAULT_ID, "Common assault", |o| {
                    o.short_name = "Common assault".into();
                    o.offence_category = "Assault offences".into();
                    o.provision = "Criminal Justice Act 1988 s.39".into();
                    o.maximum_sentence_amount = "6 months".into();
                }),
                offence(BURGLARY_ID, "Domestic burglary", |o| {
                    o.offence_category = "Burglary offences".into();
                    o.provision = "Theft Act 1968 s.9".into();
                    o.maximum_sentence_amount = "14 years".into();
                    o.minimum_sentence_code = "A".into();
                }),
                offence(MANSLAUGHTER_ID, "Manslaughter", |o| {
                    o.offence_category = "Violent offences".into();
                    o.provision = "Common law".into();
                    o.maximum_sentence_amount = "Life".into();
                    o.specified_violent = true;
                }),
                offence(WEAPON_ID, "Possession of a bladed article", |o| {
                    o.offence_category = "Weapon offences".into();
                    o.provision = "Criminal Justice Act 1988 s.139".into();
                    o.maximum_sentence_amount = "4 years".into();
                    o.minimum_sentence_code = "D".into();
                }),
            ],
            ..Self::default()
        }
    }

    pub fn with_chunks(mut self, chunks: Vec<GuidelineChunk>) -> Self {
        self.chunks = chunks;
        self
    }

    fn offence_filter(&self, chunk: &GuidelineChunk, offence_id: Option<&str>) -> bool {
        let Some(offence_id) = offence_id else {
            return true;
        };
        if chunk.offence_id.as_deref() == Some(offence_id) {
            return true;
        }
        self.links
            .get(offence_id)
            .map(|guidelines| guidelines.contains(&chunk.guideline_id))
            .unwrap_or(false)
    }

    fn ranked_chunks(&self, top_k: u32, offence_id: Option<&str>) -> Vec<GuidelineChunk> {
        let mut rows: Vec<GuidelineChunk> = self
            .chunks
            .iter()
            .filter(|chunk| self.offence_filter(chunk, offence_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows.truncate(top_k as usize);
        rows
    }
}

#[async_trait]
impl GuidelineStore for InMemoryStore {
    async fn fetch_offence_by_id(
        &self,
        offence_id: &str,
    ) -> Result<Option<OffenceRecord>, StoreError> {
        if Uuid::parse_str(offence_id).is_err() {
            return Err(StoreError::MalformedId(format!(
                "invalid input syntax for type uuid: \"{offence_id}\""
            )));
        }
        Ok(self
            .offences
            .iter()
            .find(|o| o.offence_id == offence_id)
            .cloned())
    }

    async fn search_offences(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<OffenceRecord>, StoreError> {
        let needle = query.to_lowercase();
        let mut rows: Vec<OffenceRecord> = self
            .offences
            .iter()
            .filter(|o| {
                o.canonical_name.to_lowercase().contains(&needle)
                    || o.short_name.to_lowercase().contains(&needle)
                    || o.provision.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn fetch_sentencing_matrix(
        &self,
        offence_id: &str,
    ) -> Result<Vec<SentencingMatrixRow>, StoreError> {
        Ok(self.matrix.get(offence_id).cloned().unwrap_or_default())
    }

    async fn search_chunks_text(
        &self,
        _query: &str,
        top_k: u32,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        Ok(self.ranked_chunks(top_k, offence_id))
    }

    async fn search_chunks_hybrid(
        &self,
        _query: &str,
        _embedding: &[f32],
        top_k: u32,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        // Tag hybrid rows so tests can tell which path ran.
        Ok(self
            .ranked_chunks(top_k, offence_id)
            .into_iter()
            .map(|mut chunk| {
                chunk.vector_score = Some(0.9);
                chunk.text_score = Some(0.1);
                chunk
            })
            .collect())
    }

    async fn store_calculation_audit(
        &self,
        offence_id: &str,
        request_payload: &Value,
        result_payload: &Value,
    ) -> Result<(), StoreError> {
        if self.fail_audit {
            return Err(StoreError::Api {
                status: 500,
                message: "audit table unavailable".into(),
            });
        }
        self.audits
            .lock()
            .expect("audit mutex poisoned")
            .push((offence_id.to_string(), request_payload.clone(), result_payload.clone()));
        Ok(())
    }
}

pub fn offence(id: &str, name: &str, customize: impl FnOnce(&mut OffenceRecord)) -> OffenceRecord {
    let mut record = OffenceRecord {
        offence_id: id.into(),
        canonical_name: name.into(),
        short_name: name.into(),
        offence_category: String::new(),
        provision: String::new(),
        guideline_url: String::new(),
        legislation_url: String::new(),
        maximum_sentence_type: "custody".into(),
        maximum_sentence_amount: String::new(),
        minimum_sentence_code: String::new(),
        specified_violent: false,
        specified_sexual: false,
        specified_terrorist: false,
        listed_offence: false,
        schedule18a_offence: false,
        schedule19za: false,
        cta_notification: false,
    };
    customize(&mut record);
    record
}

pub fn chunk(id: &str, guideline_id: &str, offence_id: Option<&str>, score: f64) -> GuidelineChunk {
    GuidelineChunk {
        chunk_id: id.into(),
        guideline_id: guideline_id.into(),
        offence_id: offence_id.map(Into::into),
        section_type: Some("harm".into()),
        section_heading: Some(format!("Section {id}")),
        chunk_text: format!("Guideline text for {id}"),
        source_url: Some(format!("https://guidelines.example/{guideline_id}")),
        score: Some(score),
        vector_score: None,
        text_score: None,
    }
}

pub struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.1, 0.2, 0.3])
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Api {
            status: 500,
            message: "embedding backend down".into(),
        })
    }
}

pub fn test_app(store: Arc<InMemoryStore>) -> Router {
    test_app_with_embedder(store, None)
}

pub fn test_app_with_embedder(
    store: Arc<InMemoryStore>,
    embedder: Option<Arc<dyn Embedder>>,
) -> Router {
    let store: Arc<dyn GuidelineStore> = store;
    let retrieval = Arc::new(RetrievalService::new(store.clone(), embedder, 6, true));
    server::rest::api_router()
        .layer(CorsLayer::permissive())
        .with_state(AppState { store, retrieval })
}

/// Minimal valid body for surcharge-focused calculations: no custodial
/// term, fixed ages, not-guilty plea.
pub fn calculate_surcharge_only_body(
    offence_id: &str,
    offence_date: &str,
    sentence_type: &str,
    fine_amount: Option<f64>,
) -> Value {
    let mut body = json!({
        "offence_id": offence_id,
        "offence_date": offence_date,
        "conviction_date": "2024-02-10",
        "sentence_date": "2024-03-10",
        "age_at_offence": 30,
        "age_at_conviction": 30,
        "age_at_sentence": 30,
        "plea_stage": "not_guilty",
        "sentence_type": sentence_type,
    });
    if let Some(fine) = fine_amount {
        body["fine_amount"] = json!(fine);
    }
    body
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

pub async fn post_json(app: &Router, uri: &str, json: &Value) -> (StatusCode, Value) {
    post_raw(app, uri, &json.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}
