//! Confidence reconciliation.
//!
//! Post-processes the fully resolved record list: guessed assignments whose
//! per-key identifier sequence matches the authoritative one are upgraded to
//! confirmed, and one consistent confidence status is enforced per identifier
//! value across all records sharing it.

use std::collections::{BTreeMap, HashMap};

use super::index::BlockVisitPools;
use super::warnings::WarningCollector;
use super::ResolutionError;
use crate::models::{BlockVisitId, BlockVisitIdStatus, FileRecord, GroupKey};

/// Merge two confidence claims for the same identifier value.
///
/// Equal claims pass through. A disagreement involving a confirmed claim
/// resolves to confirmed (the caller records a warning); any other
/// disagreement is a genuine inconsistency the pipeline cannot resolve.
pub fn merge_statuses(
    id: &BlockVisitId,
    left: BlockVisitIdStatus,
    right: BlockVisitIdStatus,
) -> Result<(BlockVisitIdStatus, bool), ResolutionError> {
    if left == right {
        return Ok((left, false));
    }
    if left == BlockVisitIdStatus::Confirmed || right == BlockVisitIdStatus::Confirmed {
        return Ok((BlockVisitIdStatus::Confirmed, true));
    }
    Err(ResolutionError::StatusConflict {
        block_visit_id: id.clone(),
        left,
        right,
    })
}

/// The consecutive-deduplicated identifier sequence per group key, in file
/// order.
fn file_derived_sequences(records: &[FileRecord]) -> BTreeMap<GroupKey, Vec<BlockVisitId>> {
    let mut sequences: BTreeMap<GroupKey, Vec<BlockVisitId>> = BTreeMap::new();
    for record in records {
        let Some(id) = &record.block_visit_id else {
            continue;
        };
        let sequence = sequences.entry(record.group_key()).or_default();
        if sequence.last() != Some(id) {
            sequence.push(id.clone());
        }
    }
    sequences
}

fn matches_authoritative(sequence: &[BlockVisitId], authoritative: &[i64]) -> bool {
    sequence.len() == authoritative.len()
        && sequence
            .iter()
            .zip(authoritative)
            .all(|(id, expected)| id.as_real() == Some(*expected))
}

/// Tighten confidence classifications over the resolved record list.
pub fn reconcile_confidence(
    mut records: Vec<FileRecord>,
    usable: &BlockVisitPools,
    warnings: &mut WarningCollector,
) -> Result<Vec<FileRecord>, ResolutionError> {
    // Guessed assignments are confirmed when the identifiers of their group
    // appear in exactly the authoritative order.
    let sequences = file_derived_sequences(&records);
    for record in &mut records {
        if record.block_visit_id_status != Some(BlockVisitIdStatus::Guessed) {
            continue;
        }
        let key = record.group_key();
        let matches = match (sequences.get(&key), usable.get(&key)) {
            (Some(sequence), Some(authoritative)) => {
                matches_authoritative(sequence, authoritative)
            }
            _ => false,
        };
        if matches {
            record.block_visit_id_status = Some(BlockVisitIdStatus::Confirmed);
        }
    }

    // One consistent status per identifier value. Inferred records carry no
    // independent claim; they absorb whatever their identifier resolves to.
    let mut status_by_id: HashMap<BlockVisitId, BlockVisitIdStatus> = HashMap::new();
    for record in &records {
        let (Some(id), Some(status)) = (&record.block_visit_id, record.block_visit_id_status)
        else {
            continue;
        };
        if status == BlockVisitIdStatus::Inferred {
            continue;
        }
        match status_by_id.get(id) {
            None => {
                status_by_id.insert(id.clone(), status);
            }
            Some(&existing) => {
                let (merged, warned) = merge_statuses(id, existing, status)?;
                if warned {
                    warnings.record_warning(format!(
                        "Conflicting confidence statuses ({} and {}) for block visit {}; \
                         recording it as confirmed",
                        existing, status, id
                    ));
                }
                status_by_id.insert(id.clone(), merged);
            }
        }
    }

    for record in &mut records {
        let Some(id) = &record.block_visit_id else {
            continue;
        };
        if matches!(
            record.block_visit_id_status,
            Some(BlockVisitIdStatus::Guessed) | Some(BlockVisitIdStatus::Inferred)
        ) {
            if let Some(&status) = status_by_id.get(id) {
                record.block_visit_id_status = Some(status);
            }
        }
    }

    Ok(records)
}
