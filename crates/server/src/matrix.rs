//! Culpability/harm matrix matching.

use shared_types::{SentencingMatrixRow, SentencingRange};

/// Pick the matrix row matching the requested culpability and harm
/// labels: exact case-folded equality first, then containment (useful for
/// values like "Category 1" against "Harm Category 1"). No match is not
/// an error; the calculation simply carries no matched range.
pub fn pick_sentencing_range(
    culpability: Option<&str>,
    harm: Option<&str>,
    matrix_rows: &[SentencingMatrixRow],
) -> Option<SentencingRange> {
    let culpability = culpability?.trim().to_lowercase();
    let harm = harm?.trim().to_lowercase();
    if culpability.is_empty() || harm.is_empty() {
        return None;
    }

    for row in matrix_rows {
        let row_culp = row.culpability.trim().to_lowercase();
        let row_harm = row.harm.trim().to_lowercase();
        if row_culp == culpability && row_harm == harm {
            return Some(SentencingRange::from(row));
        }
    }

    for row in matrix_rows {
        let row_culp = row.culpability.trim().to_lowercase();
        let row_harm = row.harm.trim().to_lowercase();
        if row_culp.contains(&culpability) && row_harm.contains(&harm) {
            return Some(SentencingRange::from(row));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(culpability: &str, harm: &str) -> SentencingMatrixRow {
        SentencingMatrixRow {
            matrix_id: "m1".into(),
            guideline_id: "g1".into(),
            offence_id: None,
            culpability: culpability.into(),
            harm: harm.into(),
            starting_point_text: "2 years' custody".into(),
            category_range_text: "1 - 4 years' custody".into(),
        }
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let rows = vec![row("Culpability A", "Harm Category 1")];
        let matched = pick_sentencing_range(Some("culpability a"), Some("harm category 1"), &rows);
        assert_eq!(matched.unwrap().culpability, "Culpability A");
    }

    #[test]
    fn containment_fallback_matches_partial_labels() {
        let rows = vec![
            row("Culpability A", "Harm Category 1"),
            row("Culpability B", "Harm Category 2"),
        ];
        let matched = pick_sentencing_range(Some("B"), Some("Category 2"), &rows);
        assert_eq!(matched.unwrap().harm, "Harm Category 2");
    }

    #[test]
    fn exact_match_wins_over_containment() {
        let rows = vec![row("A", "1"), row("Culpability A", "Harm 1")];
        let matched = pick_sentencing_range(Some("a"), Some("1"), &rows).unwrap();
        assert_eq!(matched.culpability, "A");
    }

    #[test]
    fn both_labels_must_match_the_same_row() {
        let rows = vec![row("Culpability A", "Harm 1"), row("Culpability B", "Harm 2")];
        assert!(pick_sentencing_range(Some("A"), Some("Harm 2"), &rows).is_none());
    }

    #[test]
    fn missing_labels_or_rows_yield_none() {
        let rows = vec![row("A", "1")];
        assert!(pick_sentencing_range(None, Some("1"), &rows).is_none());
        assert!(pick_sentencing_range(Some("A"), None, &rows).is_none());
        assert!(pick_sentencing_range(Some("A"), Some("1"), &[]).is_none());
        assert!(pick_sentencing_range(Some("  "), Some("1"), &rows).is_none());
    }
}
