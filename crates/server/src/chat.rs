//! Chat-turn orchestration.
//!
//! A chat turn optionally drives a calculation (inheriting the outer
//! offence context), always runs retrieval over the user message, and
//! composes a short reply: calculation summary, warnings, top citation.

use std::sync::Arc;

use shared_types::{AppError, CalculateSentenceResponse, ChatTurnRequest, ChatTurnResponse, GuidelineChunk};

use crate::calculator;
use crate::retrieval::RetrievalService;
use crate::store::GuidelineStore;

pub async fn chat_turn(
    store: Arc<dyn GuidelineStore>,
    retrieval: &RetrievalService,
    req: ChatTurnRequest,
) -> Result<ChatTurnResponse, AppError> {
    let mut follow_up = Vec::new();
    let mut calc_response: Option<CalculateSentenceResponse> = None;
    let mut offence_id = req.offence_id.clone();

    if let Some(mut calc_request) = req.calculation {
        if calc_request.offence_id.is_none() {
            calc_request.offence_id = offence_id.clone();
        }
        if calc_request.offence_id.is_none() && calc_request.offence_query.is_none() {
            calc_request.offence_query = req.offence_query.clone();
        }
        let response = calculator::run(store, &calc_request).await?;
        offence_id = Some(response.offence_id.clone());
        calc_response = Some(response);
    } else if offence_id.is_none() && req.offence_query.is_none() {
        follow_up.push("Which offence is this for? Provide offence_id or offence name.".to_string());
    }

    let citations = retrieval
        .search(&req.message, offence_id.as_deref(), req.top_k)
        .await?;

    if !follow_up.is_empty() {
        return Ok(ChatTurnResponse {
            reply: "I need one more detail before I can calculate a sentence.".to_string(),
            calculation: calc_response,
            citations,
            follow_up_questions: follow_up,
        });
    }

    Ok(ChatTurnResponse {
        reply: compose_reply(calc_response.as_ref(), &citations),
        calculation: calc_response,
        citations,
        follow_up_questions: Vec::new(),
    })
}

fn fmt_months(value: Option<f64>) -> String {
    match value {
        Some(months) => months.to_string(),
        None => "not determined".to_string(),
    }
}

fn compose_reply(calc: Option<&CalculateSentenceResponse>, citations: &[GuidelineChunk]) -> String {
    let mut parts = Vec::new();

    if let Some(calc) = calc {
        parts.push(format!(
            "Calculated sentence for {}: post-plea term {} months, estimated custody served {} months, victim surcharge £{}.",
            calc.offence_name,
            fmt_months(calc.post_plea_term_months),
            fmt_months(calc.estimated_time_in_custody_months),
            calc.victim_surcharge_gbp
        ));
        if !calc.warnings.is_empty() {
            parts.push(format!("Warnings: {}", calc.warnings.join(" ")));
        }
    }

    if let Some(top) = citations.first() {
        let heading = top
            .section_heading
            .as_deref()
            .or(top.section_type.as_deref())
            .unwrap_or("section");
        let url = top.source_url.as_deref().unwrap_or("no-url");
        parts.push(format!("Top supporting guideline section: {heading} ({url})."));
    } else {
        parts.push("No guideline citation found for this query.".to_string());
    }

    parts.join("\n\n")
}
