//! Public API surface for the pipeline.
//!
//! This file consolidates the data transfer types handed to callers: resolved
//! assignments, archive rows and per-night operation summaries. All types
//! derive Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

use crate::models::{BlockVisitId, BlockVisitIdStatus, ObservationStatus};

/// The resolved identifier and confidence for one observation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockVisitAssignment {
    pub file_name: String,
    pub block_visit_id: BlockVisitId,
    pub status: BlockVisitIdStatus,
}

/// The outcome of resolving one night.
///
/// Assignments preserve the start-time order of the input files. Warnings are
/// collected explicitly rather than in process-wide state, so callers decide
/// how to surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightResolution {
    pub assignments: Vec<BlockVisitAssignment>,
    pub warnings: Vec<String>,
}

impl NightResolution {
    /// Look up the assignment for a file name.
    pub fn assignment_for(&self, file_name: &str) -> Option<&BlockVisitAssignment> {
        self.assignments.iter().find(|a| a.file_name == file_name)
    }
}

/// One observation group row in the archive, representing a block visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationGroup {
    /// The resolved block-visit identifier, rendered as a string.
    pub group_identifier: String,
    /// Human-readable name, `SALT-<identifier>`.
    pub name: String,
    pub status: ObservationStatus,
    /// Confidence of the identifier assignment backing this group.
    pub id_status: BlockVisitIdStatus,
    /// File names belonging to this group, in start-time order.
    pub file_names: Vec<String>,
}

/// Summary of a per-night archive population run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulateSummary {
    pub groups_stored: usize,
    pub files_archived: usize,
    pub files_skipped: usize,
    pub warnings: Vec<String>,
}

/// Summary of a per-night status re-synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub groups_checked: usize,
    pub groups_updated: usize,
}
