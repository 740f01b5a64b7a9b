//! Repository traits for the two databases the pipeline talks to.
//!
//! The SDB is the proposal/scheduling database owned by the telescope; the
//! archive is the science data archive this pipeline populates. Both are
//! consumed through narrow async traits so that the resolution core stays
//! independent of any particular SQL backend.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::ObservationGroup;
use crate::models::{BlockVisitRow, FileDataRow, Night, ObservationStatus};

/// Read access to the SALT proposal/scheduling database (SDB).
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SdbRepository: Send + Sync {
    /// All file-data log entries whose timestamp falls in the night's
    /// 24-hour window (12:00 UTC to 12:00 UTC).
    ///
    /// # Returns
    /// * `Ok(Vec<FileDataRow>)` - Rows as stored, unnormalized
    /// * `Err(RepositoryError)` - If the query fails
    async fn file_data_for_night(&self, night: Night) -> RepositoryResult<Vec<FileDataRow>>;

    /// All block visits of the night, joined through the proposal, target and
    /// observation chains, regardless of status.
    async fn block_visits_for_night(&self, night: Night) -> RepositoryResult<Vec<BlockVisitRow>>;

    /// Whether a proposal code exists in the proposal table.
    ///
    /// Callers cache the answer per night; implementations need not.
    async fn is_existing_proposal_code(&self, proposal_code: &str) -> RepositoryResult<bool>;

    /// The current status of a block visit.
    ///
    /// Observations not belonging to a block visit are accepted by default,
    /// so implementations return `Accepted` for unknown identifiers.
    async fn block_visit_status(&self, block_visit_id: i64)
        -> RepositoryResult<ObservationStatus>;
}

/// Write access to the science data archive.
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// Whether a file has already been archived.
    async fn file_exists(&self, file_name: &str) -> RepositoryResult<bool>;

    /// Store one observation group with its files for a night.
    ///
    /// Storing a group whose identifier already exists for the night replaces
    /// the previous row, keeping population idempotent.
    async fn store_observation_group(
        &self,
        night: Night,
        group: &ObservationGroup,
    ) -> RepositoryResult<()>;

    /// All observation groups archived for a night.
    async fn observation_groups_for_night(
        &self,
        night: Night,
    ) -> RepositoryResult<Vec<ObservationGroup>>;

    /// Update the observation status of an archived group.
    async fn update_group_status(
        &self,
        night: Night,
        group_identifier: &str,
        status: ObservationStatus,
    ) -> RepositoryResult<()>;

    /// Delete everything archived for a night.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of observation groups removed
    async fn delete_night(&self, night: Night) -> RepositoryResult<usize>;
}
