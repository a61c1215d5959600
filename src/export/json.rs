//! JSON export for interoperability with other tools

use super::{stage, StagedFile};
use crate::error::{CorrelatorError, Result};
use crate::timestamp::format_timestamp;
use crate::types::{CorrelationRecord, MatchStrategy, MetadataSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Run counts carried in the JSON metadata block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCounts {
    pub matched: usize,
    pub unmatched: usize,
    pub skipped_waypoints: usize,
}

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrelationJson {
    /// Schema version for forward compatibility
    pub version: String,
    pub metadata: ExportMetadata,
    pub records: Vec<RecordJson>,
}

/// Export metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// wpcorr version that generated this file
    pub generator_version: String,
    pub exported_at: String,
    pub record_count: usize,
    #[serde(flatten)]
    pub counts: ExportCounts,
}

/// JSON representation of one correlation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordJson {
    pub waypoint_name: String,
    pub waypoint_lat: f64,
    pub waypoint_lon: f64,
    pub waypoint_timestamp: String,
    pub waypoint_description: Option<String>,
    pub video_file: Option<String>,
    pub video_full_path: Option<String>,
    pub video_creation_time: Option<String>,
    pub video_duration: Option<f64>,
    pub metadata_source: Option<MetadataSource>,
    pub match_strategy: Option<MatchStrategy>,
    pub time_offset_seconds: Option<f64>,
    pub time_offset_formatted: Option<String>,
}

/// Write correlation records to a JSON file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_json(
    records: &[CorrelationRecord],
    counts: ExportCounts,
    output_path: &Path,
) -> Result<()> {
    stage_json(records, counts, output_path)?.commit()?;

    info!("Wrote {} records to {}", records.len(), output_path.display());

    Ok(())
}

pub(crate) fn stage_json(
    records: &[CorrelationRecord],
    counts: ExportCounts,
    output_path: &Path,
) -> Result<StagedFile> {
    let output = CorrelationJson {
        version: SCHEMA_VERSION.to_string(),
        metadata: ExportMetadata {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            record_count: records.len(),
            counts,
        },
        records: records.iter().map(record_to_json).collect(),
    };

    stage(output_path, "json.tmp", |writer| {
        serde_json::to_writer_pretty(writer, &output).map_err(|e| CorrelatorError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        })
    })
}

fn record_to_json(record: &CorrelationRecord) -> RecordJson {
    let video = record.video.as_ref();

    RecordJson {
        waypoint_name: record.waypoint.name.clone(),
        waypoint_lat: record.waypoint.lat,
        waypoint_lon: record.waypoint.lon,
        waypoint_timestamp: format_timestamp(&record.waypoint.timestamp),
        waypoint_description: record.waypoint.description.clone(),
        video_file: video.map(|v| v.filename.clone()),
        video_full_path: video.map(|v| v.path.to_string_lossy().to_string()),
        video_creation_time: video
            .and_then(|v| v.creation_time.as_ref())
            .map(format_timestamp),
        video_duration: video.and_then(|v| v.duration_seconds),
        metadata_source: video.map(|v| v.metadata_source),
        match_strategy: record.match_strategy,
        time_offset_seconds: record.time_offset_seconds,
        time_offset_formatted: record.time_offset_formatted.clone(),
    }
}
