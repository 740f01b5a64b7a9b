//! Identifier sanitization.
//!
//! A block visit id on a file record is only kept if the night's index knows
//! it (usable or ignorable); anything else must belong to a different night
//! and is untrustworthy. Whatever survives came from an authoritative source
//! and is marked confirmed.

use std::collections::HashSet;

use super::index::{self, BlockVisitPools};
use crate::models::{BlockVisitIdStatus, FileRecord};

/// Clear unknown identifiers and confirm the known ones.
pub fn sanitize_block_visit_ids(
    mut records: Vec<FileRecord>,
    usable: &BlockVisitPools,
    ignorable: &BlockVisitPools,
) -> Vec<FileRecord> {
    let known: HashSet<i64> = index::all_ids(usable)
        .chain(index::all_ids(ignorable))
        .collect();

    for record in &mut records {
        let Some(id) = record.block_visit_id.as_ref().and_then(|id| id.as_real()) else {
            continue;
        };
        if known.contains(&id) {
            record.block_visit_id_status = Some(BlockVisitIdStatus::Confirmed);
        } else {
            record.block_visit_id = None;
            record.block_visit_id_status = None;
        }
    }
    records
}
