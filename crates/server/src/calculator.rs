//! Calculation orchestration.
//!
//! `calculate` is the pure composition of the rules engine over an
//! already-resolved offence; `run` adds the I/O around it (resolution,
//! matrix fetch, best-effort audit). Trace entries are emitted in a fixed
//! order: resolution, plea, minimum, floor lifts, release.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use shared_types::{
    AppError, CalculateSentenceRequest, CalculateSentenceResponse, OffenceRecord,
    SentencingMatrixRow,
};

use crate::matrix::pick_sentencing_range;
use crate::resolver::resolve_offence;
use crate::rules;
use crate::store::GuidelineStore;

/// Ceiling on how long a detached audit write may run.
const AUDIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Pure calculation over a resolved offence and its matrix rows.
pub fn calculate(
    offence: &OffenceRecord,
    req: &CalculateSentenceRequest,
    matrix_rows: &[SentencingMatrixRow],
) -> CalculateSentenceResponse {
    let mut trace = Vec::new();

    let pre_plea = req.pre_plea_term_months;
    let post_plea = rules::sentence_after_plea(pre_plea, req.plea_stage);
    if let (Some(pre), Some(post)) = (pre_plea, post_plea) {
        trace.push(format!(
            "Applied plea factor for {}: pre={} -> post={}",
            req.plea_stage.as_str(),
            pre,
            post
        ));
    }

    let min_decision = rules::minimum_sentence_decision(offence, req);
    if min_decision.triggered {
        trace.push(
            min_decision
                .reason
                .clone()
                .unwrap_or_else(|| "Minimum sentence rule triggered".to_string()),
        );
    }

    let (pre_plea, post_plea, floor_trace) =
        rules::apply_minimum_sentence_floor(pre_plea, post_plea, &min_decision);
    trace.extend(floor_trace);

    let release = rules::release_decision(offence, req, post_plea);
    trace.push(release.reason.clone());

    let estimated_time = match (post_plea, release.release_fraction) {
        (Some(post), Some(fraction)) => Some(rules::round2(post * fraction)),
        _ => None,
    };

    let surcharge = rules::victim_surcharge(
        req.offence_date,
        req.age_at_offence,
        req.sentence_type,
        req.fine_amount,
        post_plea,
    );

    let matched_range =
        pick_sentencing_range(req.culpability.as_deref(), req.harm.as_deref(), matrix_rows);
    let warnings = rules::build_warnings(offence, req, pre_plea);

    CalculateSentenceResponse {
        offence_id: offence.offence_id.clone(),
        offence_name: offence.canonical_name.clone(),
        sentence_type: req.sentence_type,
        pre_plea_term_months: pre_plea,
        post_plea_term_months: post_plea,
        minimum_sentence_triggered: min_decision.triggered,
        minimum_floor_pre_plea_months: min_decision.floor_pre_months,
        minimum_floor_post_plea_months: min_decision.floor_post_months,
        release_fraction: release.release_fraction,
        estimated_time_in_custody_months: estimated_time,
        victim_surcharge_gbp: rules::round2(surcharge),
        matched_range,
        warnings,
        trace,
    }
}

/// Resolve the offence, fetch its matrix, calculate, and fire the audit.
pub async fn run(
    store: Arc<dyn GuidelineStore>,
    req: &CalculateSentenceRequest,
) -> Result<CalculateSentenceResponse, AppError> {
    let resolved = resolve_offence(
        store.as_ref(),
        req.offence_id.as_deref(),
        req.offence_query.as_deref(),
    )
    .await?;

    let matrix_rows = store
        .fetch_sentencing_matrix(&resolved.offence.offence_id)
        .await?;

    let mut response = calculate(&resolved.offence, req, &matrix_rows);

    let mut trace = resolved.trace;
    trace.append(&mut response.trace);
    response.trace = trace;

    spawn_audit(store, req, &response);

    Ok(response)
}

/// Best-effort audit insert: detached task, bounded by a short timeout,
/// outcome never surfaces to the caller.
fn spawn_audit(
    store: Arc<dyn GuidelineStore>,
    req: &CalculateSentenceRequest,
    response: &CalculateSentenceResponse,
) {
    let (request_payload, result_payload): (Value, Value) =
        match (serde_json::to_value(req), serde_json::to_value(response)) {
            (Ok(request), Ok(result)) => (request, result),
            _ => {
                tracing::debug!("audit payload serialization failed; skipping audit write");
                return;
            }
        };
    let offence_id = response.offence_id.clone();

    tokio::spawn(async move {
        let write = store.store_calculation_audit(&offence_id, &request_payload, &result_payload);
        match tokio::time::timeout(AUDIT_TIMEOUT, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "audit write failed"),
            Err(_) => tracing::debug!("audit write timed out"),
        }
    });
}
