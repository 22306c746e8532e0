use serde::{Deserialize, Serialize};

/// Canonical offence row from the offence catalog, as returned by the
/// store RPCs. Lives only for the duration of one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OffenceRecord {
    pub offence_id: String,
    pub canonical_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub offence_category: String,
    /// Legislative provision, e.g. "Offences Against the Person Act 1861 s.18".
    #[serde(default)]
    pub provision: String,
    #[serde(default)]
    pub guideline_url: String,
    #[serde(default)]
    pub legislation_url: String,
    #[serde(default)]
    pub maximum_sentence_type: String,
    /// Free text; contains "life" (any case) when a life maximum applies.
    #[serde(default)]
    pub maximum_sentence_amount: String,
    /// One of "", "A", "B", "C1", "C2", "C3", "C4", "D", "E".
    #[serde(default)]
    pub minimum_sentence_code: String,
    #[serde(default)]
    pub specified_violent: bool,
    #[serde(default)]
    pub specified_sexual: bool,
    #[serde(default)]
    pub specified_terrorist: bool,
    #[serde(default)]
    pub listed_offence: bool,
    #[serde(default)]
    pub schedule18a_offence: bool,
    #[serde(default)]
    pub schedule19za: bool,
    #[serde(default)]
    pub cta_notification: bool,
}

/// One culpability/harm cell of an offence's sentencing matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentencingMatrixRow {
    #[serde(default)]
    pub matrix_id: String,
    #[serde(default)]
    pub guideline_id: String,
    #[serde(default)]
    pub offence_id: Option<String>,
    #[serde(default)]
    pub culpability: String,
    #[serde(default)]
    pub harm: String,
    #[serde(default)]
    pub starting_point_text: String,
    #[serde(default)]
    pub category_range_text: String,
}

/// A retrieved guideline chunk with its relevance score(s).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GuidelineChunk {
    pub chunk_id: String,
    #[serde(default)]
    pub guideline_id: String,
    #[serde(default)]
    pub offence_id: Option<String>,
    #[serde(default)]
    pub section_type: Option<String>,
    #[serde(default)]
    pub section_heading: Option<String>,
    #[serde(default)]
    pub chunk_text: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    /// Hybrid-search components; absent on lexical-only results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_score: Option<f64>,
}
