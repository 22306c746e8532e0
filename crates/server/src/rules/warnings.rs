use shared_types::{CalculateSentenceRequest, OffenceRecord, SentenceType};

use super::has_life_maximum;

/// Flag mandatory-life, dangerousness, and Schedule 18A mismatches.
/// Evaluated against the final (post-floor) pre-plea term.
pub fn build_warnings(
    offence: &OffenceRecord,
    req: &CalculateSentenceRequest,
    pre_plea_term_months: Option<f64>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if offence.listed_offence
        && req.age_at_sentence >= 18
        && req.prior_listed_offence_with_custody
        && pre_plea_term_months.unwrap_or(0.0) >= 120.0
    {
        warnings.push(
            "Mandatory life sentence route may be engaged for repeat listed offence; review SC283/SC273 conditions."
                .to_string(),
        );
    }

    if (offence.specified_violent || offence.specified_sexual || offence.specified_terrorist)
        && req.dangerousness_assessed
        && has_life_maximum(offence)
    {
        warnings.push(
            "Dangerousness + specified offence + life max may trigger mandatory life provisions; review SC285/SC274/SC258."
                .to_string(),
        );
    }

    if req.sentence_type == SentenceType::SpecialCustodialSentence && !offence.schedule18a_offence {
        warnings.push(
            "Special custodial sentence selected but offence is not marked Schedule 18A in offence metadata."
                .to_string(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn no_warnings_for_plain_case() {
        let warnings = build_warnings(&fixtures::offence(), &fixtures::request(), Some(24.0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn repeat_listed_offence_with_long_term() {
        let mut offence = fixtures::offence();
        offence.listed_offence = true;
        let mut req = fixtures::request();
        req.prior_listed_offence_with_custody = true;

        let warnings = build_warnings(&offence, &req, Some(120.0));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("SC283/SC273"));

        // Below the 120-month threshold the route is not flagged.
        assert!(build_warnings(&offence, &req, Some(119.0)).is_empty());
        // Youth offenders are outside the repeat-offender route.
        req.age_at_sentence = 17;
        assert!(build_warnings(&offence, &req, Some(150.0)).is_empty());
    }

    #[test]
    fn dangerousness_with_specified_offence_and_life_max() {
        let mut req = fixtures::request();
        req.dangerousness_assessed = true;
        let warnings = build_warnings(&fixtures::offence(), &req, Some(24.0));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("SC285/SC274/SC258"));

        let mut offence = fixtures::offence();
        offence.maximum_sentence_amount = "10 years".into();
        assert!(build_warnings(&offence, &req, Some(24.0)).is_empty());
    }

    #[test]
    fn special_custodial_without_schedule_18a() {
        let mut req = fixtures::request();
        req.sentence_type = SentenceType::SpecialCustodialSentence;
        let warnings = build_warnings(&fixtures::offence(), &req, Some(24.0));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Schedule 18A"));

        let mut offence = fixtures::offence();
        offence.schedule18a_offence = true;
        assert!(build_warnings(&offence, &req, Some(24.0)).is_empty());
    }

    #[test]
    fn warnings_can_stack() {
        let mut offence = fixtures::offence();
        offence.listed_offence = true;
        let mut req = fixtures::request();
        req.prior_listed_offence_with_custody = true;
        req.dangerousness_assessed = true;
        req.sentence_type = SentenceType::SpecialCustodialSentence;
        let warnings = build_warnings(&offence, &req, Some(150.0));
        assert_eq!(warnings.len(), 3);
    }
}
