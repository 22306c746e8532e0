//! Release-fraction selection.
//!
//! Several regimes overlap; the first matching branch wins, so the order
//! of checks here is load-bearing. The final branch optionally reproduces
//! a known upstream inconsistency (the "ACE bug") that swaps the 0.4 and
//! 0.5 outcomes, on by default for bug-for-bug compatibility.

use shared_types::{CalculateSentenceRequest, OffenceRecord, SentenceType};

use super::has_life_maximum;

pub const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Provision/name markers that pull a 48-month-plus term to two-thirds.
const SERIOUS_PROVISION_MARKERS: [&str; 5] = [
    "manslaughter",
    "soliciting to commit murder",
    "grievous bodily harm with intent",
    "wounding with intent",
    "gbh with intent",
];

/// Provisions excluded from the forty-percent release regime.
const FORTY_PERCENT_EXCLUSIONS: [&str; 7] = [
    "serious crime act 2015 s.76",
    "serious crime act 2015 s.75a",
    "sentencing act 2020 s.363",
    "family law act 1996 s.42a",
    "domestic abuse act 2021 s.39",
    "national security act",
    "official secrets act",
];

/// Outcome of the release-fraction decider.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDecision {
    pub release_fraction: Option<f64>,
    pub reason: String,
}

impl ReleaseDecision {
    fn new(release_fraction: Option<f64>, reason: impl Into<String>) -> Self {
        Self {
            release_fraction,
            reason: reason.into(),
        }
    }
}

/// Whether a determinate term falls in the forty-percent release regime.
/// True unless any exclusion holds; all matches are case-folded substrings.
pub fn is_forty_percent_regime(offence: &OffenceRecord, term_months: f64) -> bool {
    if term_months > 48.0 && offence.specified_violent {
        return false;
    }

    if offence.offence_category.to_lowercase().contains("sexual offence") {
        return false;
    }

    let provision = offence.provision.to_lowercase();
    if provision.contains("protection from harassment") && provision.contains("stalking") {
        return false;
    }

    !FORTY_PERCENT_EXCLUSIONS
        .iter()
        .any(|marker| provision.contains(marker))
}

/// Pick the release fraction for the post-plea term. The branch order is
/// significant; the first match wins.
pub fn release_decision(
    offence: &OffenceRecord,
    req: &CalculateSentenceRequest,
    post_plea_term_months: Option<f64>,
) -> ReleaseDecision {
    let sentence_type = req.sentence_type;

    if matches!(
        sentence_type,
        SentenceType::MandatoryLifeSentence | SentenceType::DiscretionaryLifeSentence
    ) {
        return ReleaseDecision::new(
            None,
            "Life sentence: release not represented as determinate fraction",
        );
    }

    if matches!(
        sentence_type,
        SentenceType::CommunityOrder
            | SentenceType::YouthRehabilitationOrder
            | SentenceType::Fine
            | SentenceType::ConditionalDischarge
    ) {
        return ReleaseDecision::new(None, "Non-custodial sentence");
    }

    if sentence_type == SentenceType::SuspendedSentenceOrder {
        return ReleaseDecision::new(None, "Suspended sentence: no immediate custody term");
    }

    let Some(term) = post_plea_term_months else {
        return ReleaseDecision::new(None, "No custodial term provided");
    };

    if matches!(
        sentence_type,
        SentenceType::ExtendedSentence | SentenceType::SpecialCustodialSentence
    ) {
        return ReleaseDecision::new(
            Some(TWO_THIRDS),
            "Extended/special custodial release at two-thirds",
        );
    }

    if !sentence_type.is_custodial() {
        return ReleaseDecision::new(None, "Sentence type not treated as custodial");
    }

    let life_max = has_life_maximum(offence);

    if term >= 84.0 && life_max && (offence.specified_sexual || offence.specified_violent) {
        return ReleaseDecision::new(Some(TWO_THIRDS), "Term >= 84m + life max + specified offence");
    }

    if offence.schedule19za || req.terrorism_flag {
        return ReleaseDecision::new(Some(TWO_THIRDS), "Schedule 19ZA / terrorism route");
    }

    if term >= 48.0 {
        if life_max && offence.specified_sexual {
            return ReleaseDecision::new(
                Some(TWO_THIRDS),
                "Sexual offence with life max and term >= 48m",
            );
        }
        let provision_or_name =
            format!("{} {}", offence.provision, offence.canonical_name).to_lowercase();
        if SERIOUS_PROVISION_MARKERS
            .iter()
            .any(|marker| provision_or_name.contains(marker))
        {
            return ReleaseDecision::new(
                Some(TWO_THIRDS),
                "Specified serious offence marker with term >= 48m",
            );
        }
    }

    let forty_percent = is_forty_percent_regime(offence, term);
    if req.replicate_ace_release_bug {
        // Deliberately swapped: preserves the upstream ACE inconsistency.
        if forty_percent {
            return ReleaseDecision::new(
                Some(0.5),
                "Replicating ACE release inconsistency for forty-percent regime",
            );
        }
        return ReleaseDecision::new(
            Some(0.4),
            "Replicating ACE release inconsistency for non-forty-percent regime",
        );
    }

    if forty_percent {
        ReleaseDecision::new(Some(0.4), "Forty-percent regime")
    } else {
        ReleaseDecision::new(Some(0.5), "Halfway release regime")
    }
}
