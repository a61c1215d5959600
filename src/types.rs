//! Core data types for wpcorr
//!
//! These types represent the domain model and flow through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// Track side
// =============================================================================

/// A named, timestamped, geolocated point recorded along a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Naming key used to find the matching video
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Always UTC; offsets in the source document are applied on parse
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

// =============================================================================
// Video side
// =============================================================================

/// Where a video's creation time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// Container metadata reported by the external probe
    Probe,
    /// Earliest filesystem timestamp (creation or modification)
    Filesystem,
    /// Neither the probe nor the filesystem produced a time
    Unresolved,
}

/// A discovered video file with its resolved metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// File name including extension
    pub filename: String,
    /// Absolute path to the file
    pub path: PathBuf,
    pub creation_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub metadata_source: MetadataSource,
}

impl Video {
    /// Create a video with no resolved metadata
    pub fn unresolved(path: PathBuf) -> Self {
        let filename = file_name_of(&path);
        Self {
            filename,
            path,
            creation_time: None,
            duration_seconds: None,
            metadata_source: MetadataSource::Unresolved,
        }
    }

    /// File name with the final extension stripped
    pub fn stem(&self) -> &str {
        match self.filename.rfind('.') {
            Some(dot) if dot > 0 => &self.filename[..dot],
            _ => &self.filename,
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Video container formats recognized during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Mp4,
    Avi,
    Mov,
    Mkv,
    Wmv,
    Flv,
    Webm,
    M4v,
}

impl VideoFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp4" => Some(VideoFormat::Mp4),
            "avi" => Some(VideoFormat::Avi),
            "mov" => Some(VideoFormat::Mov),
            "mkv" => Some(VideoFormat::Mkv),
            "wmv" => Some(VideoFormat::Wmv),
            "flv" => Some(VideoFormat::Flv),
            "webm" => Some(VideoFormat::Webm),
            "m4v" => Some(VideoFormat::M4v),
            _ => None,
        }
    }

    /// Canonical lowercase extension
    pub fn as_str(self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Avi => "avi",
            VideoFormat::Mov => "mov",
            VideoFormat::Mkv => "mkv",
            VideoFormat::Wmv => "wmv",
            VideoFormat::Flv => "flv",
            VideoFormat::Webm => "webm",
            VideoFormat::M4v => "m4v",
        }
    }
}

// =============================================================================
// Correlation output
// =============================================================================

/// Naming-key strategies, in the priority order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Contains,
    ReverseContains,
    TokenIntersection,
}

impl MatchStrategy {
    /// Evaluation order; the first strategy with a candidate decides
    pub const ORDER: [MatchStrategy; 4] = [
        MatchStrategy::Exact,
        MatchStrategy::Contains,
        MatchStrategy::ReverseContains,
        MatchStrategy::TokenIntersection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::Contains => "contains",
            MatchStrategy::ReverseContains => "reverse_contains",
            MatchStrategy::TokenIntersection => "token_intersection",
        }
    }
}

/// One output row: a waypoint and, when resolved, its matched video and offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRecord {
    pub waypoint: Waypoint,
    /// Present only when a video matched and its creation time is known
    pub video: Option<Video>,
    pub match_strategy: Option<MatchStrategy>,
    /// `waypoint.timestamp - video.creation_time`, negative when the waypoint came first
    pub time_offset_seconds: Option<f64>,
    pub time_offset_formatted: Option<String>,
}

impl CorrelationRecord {
    /// A record with no video and no offset
    pub fn unmatched(waypoint: Waypoint) -> Self {
        Self {
            waypoint,
            video: None,
            match_strategy: None,
            time_offset_seconds: None,
            time_offset_formatted: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.video.is_some()
    }
}
