//! Offence resolution.
//!
//! Resolve either by exact id or by fuzzy name query. The fuzzy path
//! takes the store's best trigram match (ties broken by canonical name)
//! and records how the resolution happened in the calculation trace.

use shared_types::{AppError, OffenceRecord};

use crate::store::GuidelineStore;

pub struct ResolvedOffence {
    pub offence: OffenceRecord,
    pub trace: Vec<String>,
}

pub async fn resolve_offence(
    store: &dyn GuidelineStore,
    offence_id: Option<&str>,
    offence_query: Option<&str>,
) -> Result<ResolvedOffence, AppError> {
    if let Some(id) = offence_id {
        let offence = store
            .fetch_offence_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Offence not found: {id}")))?;
        return Ok(ResolvedOffence {
            offence,
            trace: Vec::new(),
        });
    }

    let Some(query) = offence_query else {
        return Err(AppError::bad_request("Provide offence_id or offence_query"));
    };

    let matches = store.search_offences(query, 5).await?;
    let Some(chosen) = matches.first().cloned() else {
        return Err(AppError::not_found(format!("No offence found for query: {query}")));
    };

    let mut trace = vec![format!(
        "Resolved offence query '{}' to '{}' ({}).",
        query, chosen.canonical_name, chosen.offence_id
    )];
    if matches.len() > 1 {
        trace.push("Multiple matches found; top similarity match selected automatically.".to_string());
    }

    Ok(ResolvedOffence {
        offence: chosen,
        trace,
    })
}
