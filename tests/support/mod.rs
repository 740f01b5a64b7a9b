//! Shared fixtures for the integration tests.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use ssda_rust::db::LocalRepository;
use ssda_rust::fits::FitsFile;
use ssda_rust::models::{BlockVisitRow, FileDataRow, Night, ObservationStatus};

/// The night used by all fixtures.
pub fn fixture_night() -> Night {
    Night::new(NaiveDate::from_ymd_opt(2019, 6, 10).unwrap())
}

/// A start time `minutes` into the fixture night's observing.
pub fn start(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 6, 10, 20, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn log_row(
    file_name: &str,
    minutes: i64,
    proposal: Option<&str>,
    target: &str,
    id: Option<i64>,
) -> FileDataRow {
    FileDataRow {
        start_time: start(minutes),
        file_name: file_name.to_string(),
        block_visit_id: id,
        target_name: target.to_string(),
        proposal_code: proposal.map(str::to_string),
    }
}

pub fn block_visit(
    id: i64,
    proposal: &str,
    target: &str,
    status: ObservationStatus,
) -> BlockVisitRow {
    BlockVisitRow {
        block_visit_id: id,
        proposal_code: proposal.to_string(),
        target_name: target.to_string(),
        status,
    }
}

/// An in-memory FITS file exposing fixed header values.
pub struct FakeFits {
    path: String,
    headers: HashMap<String, String>,
}

impl FakeFits {
    pub fn new(path: &str, headers: &[(&str, &str)]) -> Self {
        FakeFits {
            path: path.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl FitsFile for FakeFits {
    fn header_value(&self, keyword: &str) -> Option<&str> {
        self.headers.get(keyword).map(String::as_str)
    }

    fn file_path(&self) -> &str {
        &self.path
    }
}

/// A repository preloaded with one realistic observing night:
///
/// - proposal P1, target T1: a tracked block (id 7), an ARC gap, then an
///   untracked block whose id 9 is still in the pool
/// - proposal P2, target T2: one file, no usable pool (deleted visit only)
/// - one junk file
pub fn fixture_repository() -> LocalRepository {
    LocalRepository::new()
        .with_file_data(vec![
            log_row("R20190610001.fits", 0, Some("P1"), "T1", Some(7)),
            log_row("R20190610002.fits", 5, Some("P1"), "ARC", None),
            log_row("R20190610003.fits", 10, Some("P1"), "T1", Some(7)),
            log_row("R20190610004.fits", 20, Some("P1"), "T1", None),
            log_row("R20190610005.fits", 30, Some("P2"), "T2", None),
            log_row("R20190610006.fits", 40, Some("JUNK"), "junk", None),
        ])
        .with_block_visits(vec![
            block_visit(7, "P1", "T1", ObservationStatus::Accepted),
            block_visit(9, "P1", "T1", ObservationStatus::Accepted),
            block_visit(11, "P2", "T2", ObservationStatus::Deleted),
        ])
        .with_proposal_codes(["P1", "P2"])
}
