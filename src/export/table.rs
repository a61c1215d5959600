//! CSV correlation table

use super::{stage, StagedFile};
use crate::error::{CorrelatorError, Result};
use crate::timestamp::format_timestamp;
use crate::types::CorrelationRecord;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column order of the correlation table
pub const CSV_COLUMNS: [&str; 11] = [
    "waypoint_name",
    "waypoint_lat",
    "waypoint_lon",
    "waypoint_timestamp",
    "video_file",
    "video_full_path",
    "video_creation_time",
    "video_duration",
    "time_offset_seconds",
    "time_offset_formatted",
    "waypoint_description",
];

/// One CSV line; field order must follow [`CSV_COLUMNS`]
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    waypoint_name: &'a str,
    waypoint_lat: f64,
    waypoint_lon: f64,
    waypoint_timestamp: String,
    video_file: &'a str,
    video_full_path: String,
    video_creation_time: String,
    video_duration: Option<f64>,
    time_offset_seconds: Option<f64>,
    time_offset_formatted: &'a str,
    waypoint_description: &'a str,
}

impl<'a> From<&'a CorrelationRecord> for CsvRow<'a> {
    fn from(record: &'a CorrelationRecord) -> Self {
        let wpt = &record.waypoint;
        let video = record.video.as_ref();

        CsvRow {
            waypoint_name: &wpt.name,
            waypoint_lat: wpt.lat,
            waypoint_lon: wpt.lon,
            waypoint_timestamp: format_timestamp(&wpt.timestamp),
            video_file: video.map(|v| v.filename.as_str()).unwrap_or_default(),
            video_full_path: video
                .map(|v| v.path.to_string_lossy().to_string())
                .unwrap_or_default(),
            video_creation_time: video
                .and_then(|v| v.creation_time.as_ref())
                .map(format_timestamp)
                .unwrap_or_default(),
            video_duration: video.and_then(|v| v.duration_seconds),
            time_offset_seconds: record.time_offset_seconds,
            time_offset_formatted: record.time_offset_formatted.as_deref().unwrap_or_default(),
            waypoint_description: wpt.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Write records as CSV to any writer
///
/// The header row is always written, even when there are no records.
pub fn write_csv_to<W: Write>(
    records: &[CorrelationRecord],
    writer: W,
) -> std::result::Result<(), csv::Error> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    csv.write_record(CSV_COLUMNS)?;
    for record in records {
        csv.serialize(CsvRow::from(record))?;
    }
    csv.flush()?;

    Ok(())
}

/// Write the correlation table to a file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
/// This prevents a half-written table if the write is interrupted.
pub fn write_csv(records: &[CorrelationRecord], output_path: &Path) -> Result<()> {
    stage_csv(records, output_path)?.commit()?;

    info!("Wrote {} records to {}", records.len(), output_path.display());

    Ok(())
}

pub(crate) fn stage_csv(records: &[CorrelationRecord], output_path: &Path) -> Result<StagedFile> {
    stage(output_path, "csv.tmp", |writer| {
        write_csv_to(records, writer).map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => CorrelatorError::output_error(output_path, io),
            other => CorrelatorError::OutputError {
                path: output_path.to_path_buf(),
                reason: format!("CSV write error: {:?}", other),
            },
        })
    })
}
