//! Gap-filling resolver.
//!
//! For every file record still lacking a block visit id, searches the night's
//! sequence backward and forward for a neighbor whose identifier can be
//! adopted, and falls back to the provider when no neighbor qualifies or the
//! two directions disagree.

use super::provider::BlockVisitIdProvider;
use crate::models::{BlockVisitId, BlockVisitIdStatus, FileRecord};

/// Filename prefixes of the Salticam and BCAM cameras.
///
/// These cameras fire in bursts trailing the main instrument exposure, so an
/// ambiguous file with one of these prefixes is grouped with the *following*
/// block.
const TRAILING_CAMERA_PREFIXES: [&str; 2] = ["S2", "B2"];

/// Whether a target name denotes a calibration frame.
///
/// ARC and BIAS match exactly or with an underscore suffix; FLAT additionally
/// matches space- and hyphen-suffixed forms. The asymmetry is inherited from
/// the system this replaces and is kept until the domain owners rule on it.
pub fn is_calibration_target(target_name: &str) -> bool {
    let name = target_name.to_uppercase();
    name == "ARC"
        || name.starts_with("ARC_")
        || name == "BIAS"
        || name.starts_with("BIAS_")
        || name == "FLAT"
        || name.starts_with("FLAT_")
        || name.starts_with("FLAT ")
        || name.starts_with("FLAT-")
}

fn is_trailing_camera_file(file_name: &str) -> bool {
    TRAILING_CAMERA_PREFIXES
        .iter()
        .any(|prefix| file_name.starts_with(prefix))
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

/// Scan from `index` in one direction for an adoptable identifier.
///
/// The scan never crosses a proposal boundary, and stops dead between two
/// differing science targets; calibration frames bridge records of one block.
fn candidate(records: &[FileRecord], index: usize, direction: Direction) -> Option<BlockVisitId> {
    let current = &records[index];
    let current_is_calibration = is_calibration_target(&current.target_name);
    let step: isize = match direction {
        Direction::Backward => -1,
        Direction::Forward => 1,
    };

    let mut i = index as isize + step;
    while i >= 0 && (i as usize) < records.len() {
        let neighbor = &records[i as usize];
        if neighbor.proposal_code != current.proposal_code {
            return None;
        }
        let neighbor_is_calibration = is_calibration_target(&neighbor.target_name);
        let same_target = neighbor.target_name == current.target_name;
        if !current_is_calibration && !neighbor_is_calibration && !same_target {
            // Two different science targets break block continuity even
            // within one proposal.
            return None;
        }
        if neighbor.block_visit_id.is_some()
            && (current_is_calibration || neighbor_is_calibration || same_target)
        {
            return neighbor.block_visit_id.clone();
        }
        i += step;
    }
    None
}

/// Assign an identifier to every record that lacks one.
///
/// Records are processed in start-time order; earlier assignments are visible
/// to later backward scans.
pub fn fill_missing_block_visit_ids(
    mut records: Vec<FileRecord>,
    provider: &mut BlockVisitIdProvider,
) -> Vec<FileRecord> {
    for index in 0..records.len() {
        if records[index].block_visit_id.is_some() {
            continue;
        }

        let previous = candidate(&records, index, Direction::Backward);
        let next = candidate(&records, index, Direction::Forward);

        let (id, status) = match (previous, next) {
            (None, None) => draw_from_provider(provider, &records[index]),
            (None, Some(next)) => (next, BlockVisitIdStatus::Inferred),
            (Some(previous), None) => (previous, BlockVisitIdStatus::Inferred),
            (Some(previous), Some(next)) if previous == next => {
                (previous, BlockVisitIdStatus::Inferred)
            }
            (Some(_), Some(next)) => {
                if is_trailing_camera_file(&records[index].file_name) {
                    (next, BlockVisitIdStatus::Inferred)
                } else {
                    draw_from_provider(provider, &records[index])
                }
            }
        };

        records[index].block_visit_id = Some(id);
        records[index].block_visit_id_status = Some(status);
    }
    records
}

fn draw_from_provider(
    provider: &mut BlockVisitIdProvider,
    record: &FileRecord,
) -> (BlockVisitId, BlockVisitIdStatus) {
    let id = provider.next_id(&record.group_key());
    let status = if id.is_synthetic() {
        BlockVisitIdStatus::Synthesized
    } else {
        BlockVisitIdStatus::Guessed
    };
    (id, status)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod resolve_tests;
