//! Deterministic sentencing rules: pure functions, no I/O.
//!
//! The calculation pipeline composes these in a fixed order:
//! 1. Plea-stage discount on the pre-plea term
//! 2. Statutory minimum-sentence decision (codes A, B, C1–C4, D, E)
//! 3. Floor application, lifting terms to any triggered minimum
//! 4. Release-fraction selection across the overlapping regimes
//! 5. Victim-surcharge lookup across the six date bands
//! 6. Warning synthesis for mandatory-life / dangerousness routes

pub mod minimum;
pub mod plea;
pub mod release;
pub mod surcharge;
pub mod warnings;

use chrono::NaiveDate;
use shared_types::OffenceRecord;

pub use minimum::{apply_minimum_sentence_floor, minimum_sentence_decision, MinimumDecision};
pub use plea::{plea_factor, sentence_after_plea};
pub use release::{is_forty_percent_regime, release_decision, ReleaseDecision, TWO_THIRDS};
pub use surcharge::victim_surcharge;
pub use warnings::build_warnings;

/// Round to two decimal places, the precision every monthly term and
/// monetary amount is reported at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The maximum-sentence column is free text; a life maximum is flagged by
/// the word "life" anywhere in it.
pub fn has_life_maximum(offence: &OffenceRecord) -> bool {
    offence
        .maximum_sentence_amount
        .to_lowercase()
        .contains("life")
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
