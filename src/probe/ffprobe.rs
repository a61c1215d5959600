//! ffprobe-backed [`MetadataProbe`]
//!
//! Shells out to `ffprobe -v quiet -print_format json -show_format -show_streams`
//! and reads the creation time and duration from the JSON output.

use super::command::{CommandError, ToolCommand};
use super::traits::{MetadataProbe, ProbeMetadata};
use crate::error::{CorrelatorError, Result};
use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tool name used for PATH lookup and messages
pub const FFPROBE: &str = "ffprobe";

/// Format tags that may carry the recording start, in priority order
const CREATION_TAGS: &[&str] = &["creation_time", "date", "com.apple.quicktime.creationdate"];

/// A probe backed by the `ffprobe` CLI
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: PathBuf,
    timeout: Duration,
}

impl FfprobeProbe {
    /// Create a probe using the given ffprobe binary
    pub fn new(ffprobe_path: PathBuf, timeout: Duration) -> Self {
        Self {
            ffprobe_path,
            timeout,
        }
    }

    /// Create a probe that finds ffprobe on `PATH`
    pub fn from_path(timeout: Duration) -> Option<Self> {
        which::which(FFPROBE).ok().map(|p| Self::new(p, timeout))
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }
}

impl MetadataProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<ProbeMetadata> {
        let output = ToolCommand::new(self.ffprobe_path.clone(), self.timeout)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path.as_os_str())
            .execute()
            .map_err(|e| match e {
                CommandError::NotFound(_) => CorrelatorError::ProbeUnavailable {
                    tool: self.ffprobe_path.display().to_string(),
                },
                CommandError::Timeout(timeout) => CorrelatorError::ProbeTimeout {
                    path: path.to_path_buf(),
                    timeout,
                },
                other => CorrelatorError::probe_failed(path, other.to_string()),
            })?;

        if !output.status.success() {
            let stderr = output.stderr.trim();
            let reason = if stderr.is_empty() {
                format!("ffprobe exited with {}", output.status)
            } else {
                format!("ffprobe exited with {}: {}", output.status, stderr)
            };
            return Err(CorrelatorError::probe_failed(path, reason));
        }

        parse_ffprobe_json(&output.stdout).map_err(|e| {
            CorrelatorError::probe_failed(path, format!("ffprobe JSON parse error: {}", e))
        })
    }

    fn name(&self) -> &'static str {
        FFPROBE
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    #[serde(default)]
    tags: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    tags: BTreeMap<String, serde_json::Value>,
}

/// Map ffprobe's JSON output onto [`ProbeMetadata`]
///
/// Creation time comes from the format tags first, then from the first stream
/// that carries a `creation_time`. Unparseable values count as absent.
pub fn parse_ffprobe_json(json: &str) -> std::result::Result<ProbeMetadata, serde_json::Error> {
    let output: FfprobeOutput = serde_json::from_str(json)?;

    let duration_seconds = output
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    let creation_time = output
        .format
        .as_ref()
        .and_then(|f| creation_time_from_tags(&f.tags, CREATION_TAGS))
        .or_else(|| {
            output
                .streams
                .iter()
                .find_map(|s| creation_time_from_tags(&s.tags, &["creation_time"]))
        });

    Ok(ProbeMetadata {
        creation_time,
        duration_seconds,
    })
}

fn creation_time_from_tags(
    tags: &BTreeMap<String, serde_json::Value>,
    keys: &[&str],
) -> Option<DateTime<Utc>> {
    let parse = |v: &serde_json::Value| v.as_str().and_then(parse_timestamp);

    keys.iter().find_map(|key| {
        // Exact spelling first, then other casings in key order
        tags.get(*key).and_then(parse).or_else(|| {
            tags.iter()
                .filter(|(k, _)| k.as_str() != *key && k.eq_ignore_ascii_case(key))
                .find_map(|(_, v)| parse(v))
        })
    })
}
