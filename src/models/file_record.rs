//! Per-file observation records and grouping keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifier::{BlockVisitId, BlockVisitIdStatus};
use super::status::ObservationStatus;

/// One observation file of a night, as seen by the resolution pipeline.
///
/// Records are created by merging the SDB file-data log with FITS headers,
/// then refined in place by the sanitization, gap-filling and reconciliation
/// stages. Only the final (file name, identifier, status) triple is exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub start_time: DateTime<Utc>,
    /// Unique within a night.
    pub file_name: String,
    pub block_visit_id: Option<BlockVisitId>,
    pub block_visit_id_status: Option<BlockVisitIdStatus>,
    /// Trimmed target (or calibration frame) name.
    pub target_name: String,
    pub proposal_code: Option<String>,
}

impl FileRecord {
    /// The (proposal, target) key under which this record competes for
    /// block-visit identifiers.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            proposal_code: self.proposal_code.clone(),
            target_name: self.target_name.clone(),
        }
    }
}

/// Identity key bucketing identifier candidates.
///
/// Two file records with the same key are candidates for sharing one
/// block-visit identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub proposal_code: Option<String>,
    pub target_name: String,
}

impl GroupKey {
    pub fn new(proposal_code: Option<&str>, target_name: &str) -> Self {
        GroupKey {
            proposal_code: proposal_code.map(str::to_string),
            target_name: target_name.to_string(),
        }
    }
}

/// One row of the SDB file-data log table, restricted to a night's window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDataRow {
    pub start_time: DateTime<Utc>,
    pub file_name: String,
    pub block_visit_id: Option<i64>,
    pub target_name: String,
    pub proposal_code: Option<String>,
}

/// One row of the SDB block-visit status chain for a night, joined through
/// proposal, target and observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockVisitRow {
    pub block_visit_id: i64,
    pub proposal_code: String,
    pub target_name: String,
    pub status: ObservationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_group_key_from_record() {
        let record = FileRecord {
            start_time: Utc.with_ymd_and_hms(2019, 6, 5, 20, 0, 0).unwrap(),
            file_name: "R20190605001.fits".to_string(),
            block_visit_id: None,
            block_visit_id_status: None,
            target_name: "NGC 1365".to_string(),
            proposal_code: Some("2019-1-SCI-042".to_string()),
        };
        assert_eq!(
            record.group_key(),
            GroupKey::new(Some("2019-1-SCI-042"), "NGC 1365")
        );
    }

    #[test]
    fn test_group_key_without_proposal() {
        let key = GroupKey::new(None, "BIAS");
        assert_eq!(key.proposal_code, None);
        assert_eq!(key.target_name, "BIAS");
    }
}
