//! In-memory repository implementation.
//!
//! Backs the test suites and local development. State is held behind
//! `parking_lot` locks so the repository can be shared across tasks.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::{ErrorContext, RepositoryError, RepositoryResult};
use super::repository::{ArchiveRepository, SdbRepository};
use crate::api::ObservationGroup;
use crate::models::{BlockVisitRow, FileDataRow, Night, ObservationStatus};

/// In-memory SDB and archive, preloaded with fixture data.
#[derive(Default)]
pub struct LocalRepository {
    state: RwLock<LocalState>,
}

#[derive(Default)]
struct LocalState {
    file_data: Vec<FileDataRow>,
    block_visits: Vec<BlockVisitRow>,
    proposal_codes: HashSet<String>,
    // Keyed by (night, group identifier) so re-stores replace.
    archive: BTreeMap<(Night, String), ObservationGroup>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load SDB file-data log rows.
    pub fn with_file_data(self, rows: Vec<FileDataRow>) -> Self {
        self.state.write().file_data = rows;
        self
    }

    /// Load SDB block-visit rows.
    pub fn with_block_visits(self, rows: Vec<BlockVisitRow>) -> Self {
        self.state.write().block_visits = rows;
        self
    }

    /// Register existing proposal codes.
    pub fn with_proposal_codes<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.write().proposal_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Change the stored status of a block visit, simulating SDB drift
    /// between population and synchronization runs.
    pub fn set_block_visit_status(&self, block_visit_id: i64, status: ObservationStatus) {
        let mut state = self.state.write();
        for row in &mut state.block_visits {
            if row.block_visit_id == block_visit_id {
                row.status = status;
            }
        }
    }

    /// Number of observation groups currently archived.
    pub fn archived_group_count(&self) -> usize {
        self.state.read().archive.len()
    }
}

#[async_trait]
impl SdbRepository for LocalRepository {
    async fn file_data_for_night(&self, night: Night) -> RepositoryResult<Vec<FileDataRow>> {
        let state = self.state.read();
        Ok(state
            .file_data
            .iter()
            .filter(|row| night.contains(row.start_time))
            .cloned()
            .collect())
    }

    async fn block_visits_for_night(&self, night: Night) -> RepositoryResult<Vec<BlockVisitRow>> {
        // The fixture rows are already per-night; a SQL implementation would
        // restrict through the night window join here.
        let _ = night;
        Ok(self.state.read().block_visits.clone())
    }

    async fn is_existing_proposal_code(&self, proposal_code: &str) -> RepositoryResult<bool> {
        Ok(self.state.read().proposal_codes.contains(proposal_code))
    }

    async fn block_visit_status(
        &self,
        block_visit_id: i64,
    ) -> RepositoryResult<ObservationStatus> {
        let state = self.state.read();
        Ok(state
            .block_visits
            .iter()
            .find(|row| row.block_visit_id == block_visit_id)
            .map(|row| row.status)
            // Observations without a known block visit are accepted by default.
            .unwrap_or(ObservationStatus::Accepted))
    }
}

#[async_trait]
impl ArchiveRepository for LocalRepository {
    async fn file_exists(&self, file_name: &str) -> RepositoryResult<bool> {
        let state = self.state.read();
        Ok(state
            .archive
            .values()
            .any(|group| group.file_names.iter().any(|f| f == file_name)))
    }

    async fn store_observation_group(
        &self,
        night: Night,
        group: &ObservationGroup,
    ) -> RepositoryResult<()> {
        let mut state = self.state.write();
        state
            .archive
            .insert((night, group.group_identifier.clone()), group.clone());
        Ok(())
    }

    async fn observation_groups_for_night(
        &self,
        night: Night,
    ) -> RepositoryResult<Vec<ObservationGroup>> {
        let state = self.state.read();
        Ok(state
            .archive
            .iter()
            .filter(|((n, _), _)| *n == night)
            .map(|(_, group)| group.clone())
            .collect())
    }

    async fn update_group_status(
        &self,
        night: Night,
        group_identifier: &str,
        status: ObservationStatus,
    ) -> RepositoryResult<()> {
        let mut state = self.state.write();
        match state.archive.get_mut(&(night, group_identifier.to_string())) {
            Some(group) => {
                group.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("No observation group {} archived for {}", group_identifier, night),
                ErrorContext::new("update_group_status")
                    .with_entity("observation_group")
                    .with_entity_id(group_identifier),
            )),
        }
    }

    async fn delete_night(&self, night: Night) -> RepositoryResult<usize> {
        let mut state = self.state.write();
        let before = state.archive.len();
        state.archive.retain(|(n, _), _| *n != night);
        Ok(before - state.archive.len())
    }
}
