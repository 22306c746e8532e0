//! Statutory minimum-sentence decision and floor application.
//!
//! Seven regimes, tagged by compact code on the offence record:
//! A (third domestic burglary), B (third Class A trafficking),
//! C1–C4 (firearms variants with distinct commencement dates),
//! D (repeat weapon possession), E (threats with a weapon).
//! A guilty plea discounts the floor by a fixed 0.8 (not the plea
//! table), and the youth DTO routes carry no post-plea floor at all.

use shared_types::{CalculateSentenceRequest, OffenceRecord, PleaStage};

use super::date;

/// Outcome of the minimum-sentence decider.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumDecision {
    pub triggered: bool,
    pub floor_pre_months: Option<f64>,
    pub floor_post_months: Option<f64>,
    pub reason: Option<String>,
}

impl MinimumDecision {
    fn not_triggered(reason: impl Into<String>) -> Self {
        Self {
            triggered: false,
            floor_pre_months: None,
            floor_post_months: None,
            reason: Some(reason.into()),
        }
    }

    fn with_floor(pre: f64, post: Option<f64>, reason: impl Into<String>) -> Self {
        Self {
            triggered: true,
            floor_pre_months: Some(pre),
            floor_post_months: post,
            reason: Some(reason.into()),
        }
    }
}

/// Decide whether a statutory minimum applies and what the floors are.
pub fn minimum_sentence_decision(
    offence: &OffenceRecord,
    req: &CalculateSentenceRequest,
) -> MinimumDecision {
    if req.minimum_sentence_unjust_or_exceptional {
        return MinimumDecision::not_triggered("minimum disapplied by input override");
    }

    let code = offence.minimum_sentence_code.trim().to_uppercase();
    if code.is_empty() {
        return MinimumDecision {
            triggered: false,
            floor_pre_months: None,
            floor_post_months: None,
            reason: None,
        };
    }

    let adult = req.age_at_sentence >= 18;
    let youth_16_17 = (16..=17).contains(&req.age_at_sentence);
    let guilty = req.plea_stage != PleaStage::NotGuilty;

    match code.as_str() {
        "A" => {
            if adult && req.prior_domestic_burglary_count >= 2 {
                let floor_post = if guilty { 28.8 } else { 36.0 };
                MinimumDecision::with_floor(36.0, Some(floor_post), "Domestic burglary minimum")
            } else {
                MinimumDecision::not_triggered("Conditions for A not met")
            }
        }
        "B" => {
            if adult
                && req.offence_date >= date(1997, 10, 1)
                && req.prior_class_a_trafficking_count >= 2
            {
                let floor_post = if guilty { 67.2 } else { 84.0 };
                MinimumDecision::with_floor(84.0, Some(floor_post), "Class A trafficking minimum")
            } else {
                MinimumDecision::not_triggered("Conditions for B not met")
            }
        }
        "C1" | "C2" | "C3" | "C4" => {
            let commencement = match code.as_str() {
                "C1" => date(2004, 1, 22),
                "C2" => date(2007, 4, 6),
                "C3" => date(2014, 7, 14),
                _ => date(1900, 1, 1),
            };
            if req.offence_date < commencement {
                MinimumDecision::not_triggered("Firearms date threshold not met")
            } else if adult {
                MinimumDecision::with_floor(60.0, Some(60.0), "Firearms adult minimum")
            } else if youth_16_17 {
                MinimumDecision::with_floor(36.0, Some(36.0), "Firearms youth minimum")
            } else {
                MinimumDecision::not_triggered("Under 16")
            }
        }
        "D" => {
            if req.offence_date < date(2015, 7, 17) {
                return MinimumDecision::not_triggered("Weapon possession date threshold not met");
            }
            if req.age_at_offence < 16 {
                return MinimumDecision::not_triggered("Under 16 at offence");
            }
            if !req.prior_relevant_weapon_conviction {
                return MinimumDecision::not_triggered("No qualifying prior conviction");
            }
            if req.age_at_conviction >= 18 {
                let floor_post = if guilty { 4.8 } else { 6.0 };
                MinimumDecision::with_floor(
                    6.0,
                    Some(floor_post),
                    "Weapon possession adult minimum",
                )
            } else if (16..=17).contains(&req.age_at_conviction) {
                // DTO route: no post-plea floor.
                MinimumDecision::with_floor(4.0, None, "Weapon possession youth DTO minimum")
            } else {
                MinimumDecision::not_triggered("Under 16 at conviction")
            }
        }
        "E" => {
            if adult {
                let floor_post = if guilty { 4.8 } else { 6.0 };
                MinimumDecision::with_floor(6.0, Some(floor_post), "Threats with weapon adult minimum")
            } else if youth_16_17 {
                MinimumDecision::with_floor(4.0, None, "Threats with weapon youth DTO minimum")
            } else {
                MinimumDecision::not_triggered("Under 16")
            }
        }
        other => MinimumDecision::not_triggered(format!("Unsupported minimum code {other}")),
    }
}

/// Lift the pre/post terms up to any triggered floor, emitting one trace
/// line per adjustment.
pub fn apply_minimum_sentence_floor(
    pre_plea_term_months: Option<f64>,
    post_plea_term_months: Option<f64>,
    decision: &MinimumDecision,
) -> (Option<f64>, Option<f64>, Vec<String>) {
    let mut trace = Vec::new();
    if !decision.triggered {
        return (pre_plea_term_months, post_plea_term_months, trace);
    }

    let mut adjusted_pre = pre_plea_term_months;
    let mut adjusted_post = post_plea_term_months;

    if let Some(floor_pre) = decision.floor_pre_months {
        match adjusted_pre {
            None => {
                adjusted_pre = Some(floor_pre);
                trace.push(format!("Pre-plea term set to minimum floor {floor_pre} months"));
            }
            Some(pre) if pre < floor_pre => {
                trace.push(format!(
                    "Pre-plea term raised from {pre} to minimum floor {floor_pre} months"
                ));
                adjusted_pre = Some(floor_pre);
            }
            Some(_) => {}
        }
    }

    if let Some(floor_post) = decision.floor_post_months {
        match adjusted_post {
            None => {
                adjusted_post = Some(floor_post);
                trace.push(format!("Post-plea term set to minimum floor {floor_post} months"));
            }
            Some(post) if post < floor_post => {
                trace.push(format!(
                    "Post-plea term raised from {post} to minimum floor {floor_post} months"
                ));
                adjusted_post = Some(floor_post);
            }
            Some(_) => {}
        }
    }

    (adjusted_pre, adjusted_post, trace)
}
