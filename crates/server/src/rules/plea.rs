use shared_types::PleaStage;

use super::round2;

/// Discount factor applied to the pre-plea term for each plea stage.
pub fn plea_factor(stage: PleaStage) -> f64 {
    match stage {
        PleaStage::FirstStage => 2.0 / 3.0,
        PleaStage::AfterFirstStageBeforeTrial => 3.0 / 4.0,
        PleaStage::DayOfTrial => 9.0 / 10.0,
        PleaStage::AfterTrialBegins => 19.0 / 20.0,
        PleaStage::NotGuilty => 1.0,
    }
}

/// Post-plea term: pre-plea term scaled by the stage factor, rounded to
/// two decimal places. No term in means no term out.
pub fn sentence_after_plea(pre_plea_term_months: Option<f64>, stage: PleaStage) -> Option<f64> {
    pre_plea_term_months.map(|pre| round2(pre * plea_factor(stage)))
}
