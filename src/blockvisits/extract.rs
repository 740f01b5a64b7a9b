//! Raw file-record extraction.
//!
//! Produces the night's ordered list of [`FileRecord`]s by merging two
//! sources: the SDB file-data log (authoritative) and the FITS headers of the
//! night's files. A handful of date-specific point-fixes patch known defects
//! in the source systems.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::fits::{self, keywords, FitsFile};
use crate::models::{BlockVisitId, FileDataRow, FileRecord, Night};

/// Merge the file-data log and FITS headers into one record list.
///
/// The log wins on file-name conflicts; header-only files are appended. The
/// result is sorted by start time (file name as tie-break) and has the known
/// historical corrections applied.
pub fn merge_file_records(
    night: Night,
    log_rows: Vec<FileDataRow>,
    fits_files: &[&dyn FitsFile],
) -> Vec<FileRecord> {
    let mut by_name: BTreeMap<String, FileRecord> = BTreeMap::new();

    for row in log_rows {
        let record = FileRecord {
            start_time: row.start_time,
            file_name: row.file_name.clone(),
            block_visit_id: row.block_visit_id.map(BlockVisitId::Real),
            block_visit_id_status: None,
            target_name: row.target_name.trim().to_string(),
            proposal_code: row
                .proposal_code
                .as_deref()
                .and_then(|code| fits::clean_header_value(Some(code))),
        };
        by_name.insert(row.file_name, record);
    }

    for file in fits_files {
        let file_name = fits::file_name_of(file.file_path()).to_string();
        if by_name.contains_key(&file_name) {
            continue;
        }
        let Some(record) = record_from_headers(&file_name, *file) else {
            continue;
        };
        by_name.insert(file_name, record);
    }

    let mut records: Vec<FileRecord> = by_name.into_values().collect();
    records.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });

    apply_known_data_fixes(night, &mut records);
    records
}

/// Build a record from FITS headers alone.
///
/// Files whose observation timestamp cannot be parsed are dropped; without a
/// start time they cannot take part in the neighbor search.
fn record_from_headers(file_name: &str, file: &dyn FitsFile) -> Option<FileRecord> {
    let date = fits::clean_header_value(file.header_value(keywords::DATE_OBS))?;
    let time = fits::clean_header_value(file.header_value(keywords::TIME_OBS))?;
    let start_time = fits::parse_start_datetime(&date, &time)?;

    let block_visit_id = fits::clean_header_value(file.header_value(keywords::BVISITID))
        .and_then(|raw| raw.parse::<i64>().ok())
        .map(BlockVisitId::Real);

    Some(FileRecord {
        start_time,
        file_name: file_name.to_string(),
        block_visit_id,
        block_visit_id_status: None,
        target_name: fits::clean_header_value(file.header_value(keywords::OBJECT))
            .unwrap_or_default(),
        proposal_code: fits::clean_header_value(file.header_value(keywords::PROPID)),
    })
}

/// Point-fixes for known bad historical data in the source systems.
///
/// The dates and values are literal constants on purpose; each patches a
/// defect documented in the archive operations log and must be preserved
/// exactly.
fn apply_known_data_fixes(night: Night, records: &mut [FileRecord]) {
    if night.date() == NaiveDate::from_ymd_opt(2018, 10, 13).expect("valid date") {
        // The telescope software recorded a spurious "-1" target suffix.
        for record in records.iter_mut() {
            if record.target_name == "SN2018hna-1" {
                record.target_name = "SN2018hna".to_string();
            }
        }
    }
    if night.date() == NaiveDate::from_ymd_opt(2019, 2, 24).expect("valid date") {
        // One block visit id in the log points at the wrong visit.
        for record in records.iter_mut() {
            if record.block_visit_id == Some(BlockVisitId::Real(9248)) {
                record.block_visit_id = Some(BlockVisitId::Real(9250));
            }
        }
    }
    if night.date() == NaiveDate::from_ymd_opt(2019, 6, 5).expect("valid date") {
        // Two block visit ids in the log belong to visits that never happened.
        for record in records.iter_mut() {
            if record.block_visit_id == Some(BlockVisitId::Real(10501))
                || record.block_visit_id == Some(BlockVisitId::Real(10502))
            {
                record.block_visit_id = None;
            }
        }
    }
}

/// Drop identifiers from records without a known proposal.
///
/// Calibration files sometimes carry a stray block visit id; an identifier is
/// only trustworthy if the record's proposal code exists in the proposal
/// table.
pub fn clear_ids_without_known_proposal(
    mut records: Vec<FileRecord>,
    is_existing_proposal: impl Fn(&str) -> bool,
) -> Vec<FileRecord> {
    for record in &mut records {
        let known = record
            .proposal_code
            .as_deref()
            .map(&is_existing_proposal)
            .unwrap_or(false);
        if !known {
            record.block_visit_id = None;
            record.block_visit_id_status = None;
        }
    }
    records
}
