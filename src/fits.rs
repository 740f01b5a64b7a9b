//! FITS header access boundary.
//!
//! Actual FITS parsing lives outside this crate; the pipeline only needs a
//! handful of header keywords per file. Implementations of [`FitsFile`] are
//! expected to hand back raw header strings; normalization (trimming, empty
//! and `"NONE"` sentinels becoming `None`) happens here, so the resolution
//! core never sees raw string sentinels.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// SALT FITS header keywords consumed by the pipeline.
pub mod keywords {
    /// Observation date, `yyyy-mm-dd`.
    pub const DATE_OBS: &str = "DATE-OBS";
    /// Observation start time, `HH:MM:SS` with optional fractional seconds.
    pub const TIME_OBS: &str = "TIME-OBS";
    /// Block-visit identifier, when the telescope software recorded one.
    pub const BVISITID: &str = "BVISITID";
    /// Target (or calibration frame) name.
    pub const OBJECT: &str = "OBJECT";
    /// Proposal code.
    pub const PROPID: &str = "PROPID";
}

/// Read access to one FITS file's primary header.
pub trait FitsFile {
    /// The raw value for a header keyword, or `None` if the keyword is absent.
    fn header_value(&self, keyword: &str) -> Option<&str>;

    /// Path of the file on disk.
    fn file_path(&self) -> &str;
}

/// A trimmed, sentinel-free header value.
///
/// Empty strings and the literal `NONE` occasionally written by the telescope
/// software both normalize to `None`.
pub fn clean_header_value(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(value.to_string())
}

/// Combine the `DATE-OBS` and `TIME-OBS` header values into a UTC timestamp.
///
/// Supports both the current format with fractional seconds and the legacy
/// format without. Fractional seconds are truncated, matching the precision
/// of the SDB file-data log the headers are merged with.
pub fn parse_start_datetime(start_date: &str, start_time: &str) -> Option<DateTime<Utc>> {
    let combined = format!("{} {}", start_date.trim(), start_time.trim());
    let parsed = NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    parsed.with_nanosecond(0).map(|dt| dt.and_utc())
}

/// The base name of a FITS file path, used as the night-unique file name.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_with_fractional_seconds() {
        let dt = parse_start_datetime("2019-06-05", "23:14:05.837").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2019, 6, 5, 23, 14, 5).unwrap());
    }

    #[test]
    fn test_parse_legacy_format() {
        let dt = parse_start_datetime("2012-03-18", "01:02:03").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2012, 3, 18, 1, 2, 3).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_start_datetime("not-a-date", "25:99:99").is_none());
    }

    #[test]
    fn test_clean_header_value() {
        assert_eq!(clean_header_value(Some("  NGC 1365 ")), Some("NGC 1365".to_string()));
        assert_eq!(clean_header_value(Some("")), None);
        assert_eq!(clean_header_value(Some("   ")), None);
        assert_eq!(clean_header_value(Some("NONE")), None);
        assert_eq!(clean_header_value(None), None);
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(
            file_name_of("/salt/data/2019/0605/rss/raw/R20190605001.fits"),
            "R20190605001.fits"
        );
        assert_eq!(file_name_of("R20190605001.fits"), "R20190605001.fits");
    }
}
