//! Service layer orchestrating the nightly pipeline against the repositories.
//!
//! Services run the batch queries, hand the materialized data to the pure
//! resolution pipeline in [`crate::blockvisits`], and write the outcome to the
//! archive. All functions operate on one night at a time; nights may be
//! processed in parallel by the caller since no state crosses night
//! boundaries.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use log::{info, warn};

use super::repository::{ArchiveRepository, SdbRepository};
use crate::api::{NightResolution, ObservationGroup, PopulateSummary, SyncSummary};
use crate::blockvisits;
use crate::fits::{self, keywords, FitsFile};
use crate::models::{BlockVisitId, Night, ObservationStatus};

/// Proposal codes whose files are never archived.
///
/// Junk, engineering and gain-calibration frames carry these codes in the
/// PROPID header; the original archive explicitly drops them.
const IGNORED_PROPOSAL_CODES: [&str; 5] = ["JUNK", "UNKNOWN", "NONE", "ENG", "CAL_GAIN"];

/// Whether files with this proposal code are excluded from the archive.
pub fn is_ignored_proposal(proposal_code: Option<&str>) -> bool {
    let Some(code) = proposal_code else {
        return false;
    };
    let code = code.to_uppercase();
    IGNORED_PROPOSAL_CODES.contains(&code.as_str())
        || code.contains("ENG_")
        || code.contains("ENG-")
}

/// Resolve the block-visit identifier of every file of a night.
///
/// Runs the two SDB batch queries, builds the per-night proposal-existence
/// cache, and executes the in-memory resolution pipeline.
pub async fn resolve_night(
    sdb: &dyn SdbRepository,
    night: Night,
    fits_files: &[&dyn FitsFile],
) -> Result<NightResolution> {
    let log_rows = sdb
        .file_data_for_night(night)
        .await
        .with_context(|| format!("Fetching the file-data log for {}", night))?;
    let block_visit_rows = sdb
        .block_visits_for_night(night)
        .await
        .with_context(|| format!("Fetching block visits for {}", night))?;

    // One existence lookup per distinct proposal code seen during the night.
    let mut codes: HashSet<String> = log_rows
        .iter()
        .filter_map(|row| row.proposal_code.clone())
        .collect();
    for file in fits_files {
        if let Some(code) = fits::clean_header_value(file.header_value(keywords::PROPID)) {
            codes.insert(code);
        }
    }
    let mut existing = HashSet::new();
    for code in codes {
        if sdb.is_existing_proposal_code(&code).await? {
            existing.insert(code);
        }
    }

    info!(
        "Resolving block visits for {}: {} log rows, {} block visits",
        night,
        log_rows.len(),
        block_visit_rows.len()
    );

    let resolution = blockvisits::resolve_block_visits(
        night,
        log_rows,
        fits_files,
        |code| existing.contains(code),
        &block_visit_rows,
    )
    .with_context(|| format!("Resolving block visits for {}", night))?;

    for warning in &resolution.warnings {
        warn!("{}: {}", night, warning);
    }
    Ok(resolution)
}

/// Populate the archive with one night's observation groups.
///
/// Files that are already archived or belong to an ignored proposal are
/// skipped. Re-running for the same night is a no-op apart from newly
/// appeared files.
pub async fn populate_night(
    sdb: &dyn SdbRepository,
    archive: &dyn ArchiveRepository,
    night: Night,
    fits_files: &[&dyn FitsFile],
) -> Result<PopulateSummary> {
    // Proposal codes per file, for the ignore rules below.
    let mut proposal_by_file: HashMap<String, Option<String>> = HashMap::new();
    for row in sdb.file_data_for_night(night).await? {
        proposal_by_file.insert(row.file_name.clone(), row.proposal_code.clone());
    }
    for file in fits_files {
        let name = fits::file_name_of(file.file_path()).to_string();
        proposal_by_file
            .entry(name)
            .or_insert_with(|| fits::clean_header_value(file.header_value(keywords::PROPID)));
    }

    let resolution = resolve_night(sdb, night, fits_files).await?;
    let mut summary = PopulateSummary {
        warnings: resolution.warnings.clone(),
        ..Default::default()
    };

    // File lists of groups already archived for the night. A group that gains
    // a file on a later run keeps its earlier files.
    let mut archived_files: HashMap<String, Vec<String>> = archive
        .observation_groups_for_night(night)
        .await?
        .into_iter()
        .map(|group| (group.group_identifier, group.file_names))
        .collect();

    // Group files by resolved identifier, preserving first-appearance order.
    let mut group_order: Vec<BlockVisitId> = Vec::new();
    let mut files_by_id: HashMap<BlockVisitId, Vec<String>> = HashMap::new();
    let mut id_statuses = HashMap::new();
    for assignment in &resolution.assignments {
        let proposal = proposal_by_file
            .get(&assignment.file_name)
            .cloned()
            .flatten();
        if is_ignored_proposal(proposal.as_deref()) {
            summary.files_skipped += 1;
            continue;
        }
        if archive.file_exists(&assignment.file_name).await? {
            summary.files_skipped += 1;
            continue;
        }
        if !files_by_id.contains_key(&assignment.block_visit_id) {
            group_order.push(assignment.block_visit_id.clone());
        }
        files_by_id
            .entry(assignment.block_visit_id.clone())
            .or_default()
            .push(assignment.file_name.clone());
        id_statuses.insert(assignment.block_visit_id.clone(), assignment.status);
        summary.files_archived += 1;
    }

    for id in group_order {
        let status = match id.as_real() {
            Some(real) => sdb.block_visit_status(real).await?,
            // Synthetic identifiers are unknown to the SDB.
            None => ObservationStatus::Accepted,
        };
        let mut file_names = archived_files.remove(&id.to_string()).unwrap_or_default();
        file_names.extend(files_by_id.remove(&id).unwrap_or_default());
        let group = ObservationGroup {
            group_identifier: id.to_string(),
            name: format!("SALT-{}", id),
            status,
            id_status: id_statuses[&id],
            file_names,
        };
        archive.store_observation_group(night, &group).await?;
        summary.groups_stored += 1;
    }

    info!(
        "Populated {}: {} groups, {} files archived, {} skipped",
        night, summary.groups_stored, summary.files_archived, summary.files_skipped
    );
    Ok(summary)
}

/// Re-synchronize archived observation statuses with the SDB.
///
/// Block-visit statuses change in the SDB after archiving (acceptance review,
/// deletions); this refreshes every archived group of the night.
pub async fn sync_night(
    sdb: &dyn SdbRepository,
    archive: &dyn ArchiveRepository,
    night: Night,
) -> Result<SyncSummary> {
    let groups = archive.observation_groups_for_night(night).await?;
    let mut summary = SyncSummary {
        groups_checked: groups.len(),
        ..Default::default()
    };
    for group in groups {
        // Synthetic identifiers are not SDB keys and keep their status.
        let Ok(block_visit_id) = group.group_identifier.parse::<i64>() else {
            continue;
        };
        let status = sdb.block_visit_status(block_visit_id).await?;
        if status != group.status {
            archive
                .update_group_status(night, &group.group_identifier, status)
                .await?;
            summary.groups_updated += 1;
        }
    }
    info!(
        "Synced {}: {} groups checked, {} updated",
        night, summary.groups_checked, summary.groups_updated
    );
    Ok(summary)
}

/// Delete everything archived for a night.
pub async fn delete_night(archive: &dyn ArchiveRepository, night: Night) -> Result<usize> {
    let removed = archive.delete_night(night).await?;
    info!("Deleted {} observation groups for {}", removed, night);
    Ok(removed)
}
