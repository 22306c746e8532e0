use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::offence::SentencingMatrixRow;

/// Procedural moment at which a guilty plea was indicated; selects the
/// plea discount factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PleaStage {
    FirstStage,
    AfterFirstStageBeforeTrial,
    DayOfTrial,
    AfterTrialBegins,
    NotGuilty,
}

impl PleaStage {
    pub const ALL: [PleaStage; 5] = [
        PleaStage::FirstStage,
        PleaStage::AfterFirstStageBeforeTrial,
        PleaStage::DayOfTrial,
        PleaStage::AfterTrialBegins,
        PleaStage::NotGuilty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PleaStage::FirstStage => "first_stage",
            PleaStage::AfterFirstStageBeforeTrial => "after_first_stage_before_trial",
            PleaStage::DayOfTrial => "day_of_trial",
            PleaStage::AfterTrialBegins => "after_trial_begins",
            PleaStage::NotGuilty => "not_guilty",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == value)
    }
}

/// The sentence disposal being calculated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SentenceType {
    ConditionalDischarge,
    Fine,
    CommunityOrder,
    YouthRehabilitationOrder,
    DeterminateCustodialSentence,
    SuspendedSentenceOrder,
    Dto,
    YoiDetention,
    ExtendedSentence,
    SpecialCustodialSentence,
    DiscretionaryLifeSentence,
    MandatoryLifeSentence,
}

impl SentenceType {
    pub const ALL: [SentenceType; 12] = [
        SentenceType::ConditionalDischarge,
        SentenceType::Fine,
        SentenceType::CommunityOrder,
        SentenceType::YouthRehabilitationOrder,
        SentenceType::DeterminateCustodialSentence,
        SentenceType::SuspendedSentenceOrder,
        SentenceType::Dto,
        SentenceType::YoiDetention,
        SentenceType::ExtendedSentence,
        SentenceType::SpecialCustodialSentence,
        SentenceType::DiscretionaryLifeSentence,
        SentenceType::MandatoryLifeSentence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentenceType::ConditionalDischarge => "conditional_discharge",
            SentenceType::Fine => "fine",
            SentenceType::CommunityOrder => "community_order",
            SentenceType::YouthRehabilitationOrder => "youth_rehabilitation_order",
            SentenceType::DeterminateCustodialSentence => "determinate_custodial_sentence",
            SentenceType::SuspendedSentenceOrder => "suspended_sentence_order",
            SentenceType::Dto => "dto",
            SentenceType::YoiDetention => "yoi_detention",
            SentenceType::ExtendedSentence => "extended_sentence",
            SentenceType::SpecialCustodialSentence => "special_custodial_sentence",
            SentenceType::DiscretionaryLifeSentence => "discretionary_life_sentence",
            SentenceType::MandatoryLifeSentence => "mandatory_life_sentence",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == value)
    }

    /// Whether the disposal carries a custodial term. Suspended sentence
    /// orders are not in this set.
    pub fn is_custodial(self) -> bool {
        matches!(
            self,
            SentenceType::DeterminateCustodialSentence
                | SentenceType::Dto
                | SentenceType::YoiDetention
                | SentenceType::ExtendedSentence
                | SentenceType::SpecialCustodialSentence
                | SentenceType::DiscretionaryLifeSentence
                | SentenceType::MandatoryLifeSentence
        )
    }

    /// Custodial and served immediately (not suspended).
    pub fn is_immediate_custody(self) -> bool {
        self.is_custodial() && self != SentenceType::SuspendedSentenceOrder
    }
}

fn default_true() -> bool {
    true
}

/// Validated calculation request. Constructed by the request validators,
/// which collect every violation before this type exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CalculateSentenceRequest {
    #[serde(default)]
    pub offence_id: Option<String>,
    #[serde(default)]
    pub offence_query: Option<String>,

    pub offence_date: NaiveDate,
    pub conviction_date: NaiveDate,
    pub sentence_date: NaiveDate,

    pub age_at_offence: u8,
    pub age_at_conviction: u8,
    pub age_at_sentence: u8,

    pub plea_stage: PleaStage,
    pub sentence_type: SentenceType,

    #[serde(default)]
    pub culpability: Option<String>,
    #[serde(default)]
    pub harm: Option<String>,

    #[serde(default)]
    pub pre_plea_term_months: Option<f64>,
    /// Accepted and echoed but not yet consumed by the engine; reserved
    /// for extended-sentence handling.
    #[serde(default)]
    pub extension_months: f64,
    #[serde(default)]
    pub fine_amount: Option<f64>,

    #[serde(default)]
    pub dangerousness_assessed: bool,
    #[serde(default)]
    pub prior_listed_offence_with_custody: bool,
    #[serde(default)]
    pub prior_domestic_burglary_count: u32,
    #[serde(default)]
    pub prior_class_a_trafficking_count: u32,
    #[serde(default)]
    pub prior_relevant_weapon_conviction: bool,
    #[serde(default)]
    pub terrorism_flag: bool,

    #[serde(default)]
    pub minimum_sentence_unjust_or_exceptional: bool,
    /// Defaults to true: the release-fraction decider reproduces a known
    /// upstream inconsistency that swaps the 0.4 and 0.5 outcomes. The
    /// corrected mapping is opt-in (`false`); the default is a
    /// compatibility contract and must not change without a migration.
    #[serde(default = "default_true")]
    pub replicate_ace_release_bug: bool,
}

/// Matched culpability/harm range returned alongside a calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentencingRange {
    pub culpability: String,
    pub harm: String,
    pub starting_point_text: String,
    pub category_range_text: String,
}

impl From<&SentencingMatrixRow> for SentencingRange {
    fn from(row: &SentencingMatrixRow) -> Self {
        Self {
            culpability: row.culpability.clone(),
            harm: row.harm.clone(),
            starting_point_text: row.starting_point_text.clone(),
            category_range_text: row.category_range_text.clone(),
        }
    }
}

/// Full calculation outcome. Optional fields serialize as explicit nulls
/// so absent terms and fractions are visible on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CalculateSentenceResponse {
    pub offence_id: String,
    pub offence_name: String,
    pub sentence_type: SentenceType,
    pub pre_plea_term_months: Option<f64>,
    pub post_plea_term_months: Option<f64>,
    pub minimum_sentence_triggered: bool,
    pub minimum_floor_pre_plea_months: Option<f64>,
    pub minimum_floor_post_plea_months: Option<f64>,
    pub release_fraction: Option<f64>,
    pub estimated_time_in_custody_months: Option<f64>,
    pub victim_surcharge_gbp: f64,
    pub matched_range: Option<SentencingRange>,
    pub warnings: Vec<String>,
    pub trace: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plea_stage_roundtrips_through_strings() {
        for stage in PleaStage::ALL {
            assert_eq!(PleaStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(PleaStage::parse("no_such_stage"), None);
    }

    #[test]
    fn sentence_type_roundtrips_through_strings() {
        for st in SentenceType::ALL {
            assert_eq!(SentenceType::parse(st.as_str()), Some(st));
        }
        assert_eq!(SentenceType::parse("probation"), None);
    }

    #[test]
    fn serde_names_match_wire_contract() {
        assert_eq!(
            serde_json::to_value(PleaStage::AfterFirstStageBeforeTrial).unwrap(),
            serde_json::json!("after_first_stage_before_trial")
        );
        assert_eq!(
            serde_json::to_value(SentenceType::YoiDetention).unwrap(),
            serde_json::json!("yoi_detention")
        );
    }

    #[test]
    fn suspended_order_is_not_custodial() {
        assert!(!SentenceType::SuspendedSentenceOrder.is_custodial());
        assert!(SentenceType::Dto.is_custodial());
        assert!(SentenceType::MandatoryLifeSentence.is_custodial());
        assert!(!SentenceType::Fine.is_custodial());
    }

    #[test]
    fn immediate_custody_tracks_the_custodial_set() {
        assert!(SentenceType::DeterminateCustodialSentence.is_immediate_custody());
        assert!(!SentenceType::SuspendedSentenceOrder.is_immediate_custody());
        assert!(!SentenceType::CommunityOrder.is_immediate_custody());
    }

    #[test]
    fn ace_bug_replication_defaults_on() {
        let json = serde_json::json!({
            "offence_id": "x",
            "offence_date": "2024-01-01",
            "conviction_date": "2024-02-01",
            "sentence_date": "2024-03-01",
            "age_at_offence": 30,
            "age_at_conviction": 30,
            "age_at_sentence": 30,
            "plea_stage": "not_guilty",
            "sentence_type": "fine",
        });
        let req: CalculateSentenceRequest = serde_json::from_value(json).unwrap();
        assert!(req.replicate_ace_release_bug);
        assert_eq!(req.extension_months, 0.0);
    }

    #[test]
    fn response_serializes_explicit_nulls() {
        let response = CalculateSentenceResponse {
            offence_id: "id".into(),
            offence_name: "name".into(),
            sentence_type: SentenceType::Fine,
            pre_plea_term_months: None,
            post_plea_term_months: None,
            minimum_sentence_triggered: false,
            minimum_floor_pre_plea_months: None,
            minimum_floor_post_plea_months: None,
            release_fraction: None,
            estimated_time_in_custody_months: None,
            victim_surcharge_gbp: 0.0,
            matched_range: None,
            warnings: vec![],
            trace: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["release_fraction"].is_null());
        assert!(json["matched_range"].is_null());
    }
}
