//! Block-visit identity resolution.
//!
//! Given one night's observation files, determines which files belong to the
//! same logical observation block, even when the authoritative identifier is
//! missing, ambiguous or contradictory across the two SDB sources (the
//! file-data log and the block-visit status table). Every assignment carries
//! a confidence classification so the archive records how it was derived.
//!
//! The pipeline runs in five stages over in-memory data:
//!
//! 1. [`extract`]: merge the file-data log with FITS headers
//! 2. [`index`]: build the night's authoritative identifier pools
//! 3. [`sanitize`]: drop identifiers the night does not know
//! 4. [`resolve`]: fill gaps by bidirectional neighbor search, drawing on
//!    the [`provider`] when no neighbor qualifies
//! 5. [`reconcile`]: tighten and unify confidence statuses
//!
//! Each stage takes and returns owned data so it can be tested in isolation
//! with fixed fixtures.

pub mod extract;
pub mod index;
pub mod provider;
pub mod reconcile;
pub mod resolve;
pub mod sanitize;
pub mod warnings;

pub use index::BlockVisitPools;
pub use provider::{synthetic_id, BlockVisitIdProvider};
pub use resolve::is_calibration_target;
pub use warnings::WarningCollector;

use crate::api::{BlockVisitAssignment, NightResolution};
use crate::fits::FitsFile;
use crate::models::{BlockVisitRow, FileDataRow, Night, ObservationStatus};

/// Fatal failures of the resolution pipeline.
///
/// Everything expected (missing identifiers, missing proposal codes,
/// ambiguous neighbors) is handled by fallback paths; these errors indicate
/// data the pipeline cannot safely interpret, and abort the night.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Two records claim the same identifier with confidence statuses that
    /// cannot be reconciled (neither is confirmed).
    #[error(
        "Conflicting confidence statuses for block visit {block_visit_id}: {left} and {right}"
    )]
    StatusConflict {
        block_visit_id: crate::models::BlockVisitId,
        left: crate::models::BlockVisitIdStatus,
        right: crate::models::BlockVisitIdStatus,
    },

    /// A record came out of the gap-filling stage without an identifier.
    /// Indicates a bug in the resolver, not bad input data.
    #[error("File {file_name} was left without a block visit id")]
    Unresolved { file_name: String },
}

/// Resolve the block-visit identifier of every file of one night.
///
/// Pure and synchronous: all inputs are materialized before the call. The
/// returned assignments preserve start-time order; warnings are collected
/// explicitly in the result.
///
/// # Arguments
/// * `night` - The observing night (24-hour window from 12:00 UTC)
/// * `log_rows` - SDB file-data log entries for the night
/// * `fits_files` - FITS headers of the night's files (may be empty)
/// * `is_existing_proposal` - Proposal-existence check, cached per night
/// * `block_visit_rows` - SDB block visits of the night, all statuses
pub fn resolve_block_visits(
    night: Night,
    log_rows: Vec<FileDataRow>,
    fits_files: &[&dyn FitsFile],
    is_existing_proposal: impl Fn(&str) -> bool,
    block_visit_rows: &[BlockVisitRow],
) -> Result<NightResolution, ResolutionError> {
    let mut warning_collector = WarningCollector::new();

    let records = extract::merge_file_records(night, log_rows, fits_files);
    let records = extract::clear_ids_without_known_proposal(records, is_existing_proposal);

    let usable = index::block_visit_pools(block_visit_rows, &ObservationStatus::USABLE);
    let ignorable = index::block_visit_pools(block_visit_rows, &ObservationStatus::IGNORABLE);

    let records = sanitize::sanitize_block_visit_ids(records, &usable, &ignorable);

    let mut provider = BlockVisitIdProvider::new(night, usable.clone(), &records);
    let records = resolve::fill_missing_block_visit_ids(records, &mut provider);

    let records = reconcile::reconcile_confidence(records, &usable, &mut warning_collector)?;

    let mut assignments = Vec::with_capacity(records.len());
    for record in records {
        let (Some(block_visit_id), Some(status)) =
            (record.block_visit_id, record.block_visit_id_status)
        else {
            return Err(ResolutionError::Unresolved {
                file_name: record.file_name,
            });
        };
        assignments.push(BlockVisitAssignment {
            file_name: record.file_name,
            block_visit_id,
            status,
        });
    }

    Ok(NightResolution {
        assignments,
        warnings: warning_collector.into_warnings(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockVisitId, BlockVisitIdStatus};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    fn night() -> Night {
        Night::new(NaiveDate::from_ymd_opt(2019, 6, 10).unwrap())
    }

    fn start(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, 10, 20, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn log_row(
        file_name: &str,
        minutes: i64,
        proposal: &str,
        target: &str,
        id: Option<i64>,
    ) -> FileDataRow {
        FileDataRow {
            start_time: start(minutes),
            file_name: file_name.to_string(),
            block_visit_id: id,
            target_name: target.to_string(),
            proposal_code: Some(proposal.to_string()),
        }
    }

    fn bv(id: i64, proposal: &str, target: &str, status: ObservationStatus) -> BlockVisitRow {
        BlockVisitRow {
            block_visit_id: id,
            proposal_code: proposal.to_string(),
            target_name: target.to_string(),
            status,
        }
    }

    #[test]
    fn test_full_night_resolution() {
        // A science block with a calibration gap, a Salticam burst, and an
        // untracked second block.
        let log_rows = vec![
            log_row("R001.fits", 0, "P1", "T1", Some(7)),
            log_row("R002.fits", 5, "P1", "ARC", None),
            log_row("R003.fits", 10, "P1", "T1", Some(7)),
            log_row("R004.fits", 20, "P1", "T1", Some(9)),
            log_row("R005.fits", 30, "P2", "T2", None),
        ];
        let block_visits = vec![
            bv(7, "P1", "T1", ObservationStatus::Accepted),
            bv(9, "P1", "T1", ObservationStatus::Accepted),
            bv(12, "P2", "T2", ObservationStatus::Accepted),
        ];
        let resolution = resolve_block_visits(
            night(),
            log_rows,
            &[],
            |code| code == "P1" || code == "P2",
            &block_visits,
        )
        .unwrap();

        assert_eq!(resolution.assignments.len(), 5);
        let arc = resolution.assignment_for("R002.fits").unwrap();
        assert_eq!(arc.block_visit_id, BlockVisitId::Real(7));
        assert_eq!(arc.status, BlockVisitIdStatus::Confirmed);

        // R005 had no identifier and no usable neighbor: it draws 12 from the
        // pool, and the singleton sequence matches the authoritative one.
        let untracked = resolution.assignment_for("R005.fits").unwrap();
        assert_eq!(untracked.block_visit_id, BlockVisitId::Real(12));
        assert_eq!(untracked.status, BlockVisitIdStatus::Confirmed);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_unknown_identifier_is_sanitized_then_refilled() {
        // Identifier 42 belongs to a different night; it is cleared and the
        // record resolves via its neighbor instead.
        let log_rows = vec![
            log_row("R001.fits", 0, "P1", "T1", Some(7)),
            log_row("R002.fits", 5, "P1", "T1", Some(42)),
        ];
        let block_visits = vec![bv(7, "P1", "T1", ObservationStatus::Accepted)];
        let resolution =
            resolve_block_visits(night(), log_rows, &[], |_| true, &block_visits).unwrap();
        let refilled = resolution.assignment_for("R002.fits").unwrap();
        assert_eq!(refilled.block_visit_id, BlockVisitId::Real(7));
        assert_eq!(refilled.status, BlockVisitIdStatus::Confirmed);
    }

    #[test]
    fn test_resolution_is_deterministic_across_runs() {
        let make_inputs = || {
            (
                vec![
                    log_row("R001.fits", 0, "P1", "T1", None),
                    log_row("R002.fits", 5, "P2", "T2", None),
                ],
                vec![bv(7, "P1", "T1", ObservationStatus::Accepted)],
            )
        };
        let (rows_a, visits_a) = make_inputs();
        let (rows_b, visits_b) = make_inputs();
        let first = resolve_block_visits(night(), rows_a, &[], |_| true, &visits_a).unwrap();
        let second = resolve_block_visits(night(), rows_b, &[], |_| true, &visits_b).unwrap();
        assert_eq!(first, second);
        // P2/T2 has no pool at all, so its record carries a synthetic id.
        assert!(second
            .assignment_for("R002.fits")
            .unwrap()
            .block_visit_id
            .is_synthetic());
    }
}
