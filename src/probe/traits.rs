//! Metadata probe abstraction
//!
//! The extractor only needs "given a file, maybe a creation time and a
//! duration", so the probe is a narrow trait. Tests substitute fakes for the
//! ffprobe implementation.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Container-level metadata reported by a probe
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeMetadata {
    pub creation_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
}

/// Video metadata probe backend
pub trait MetadataProbe: Send + Sync {
    /// Read creation time and duration from a video container
    ///
    /// Errors should be `ProbeUnavailable`, `ProbeTimeout` or `ProbeFailed`;
    /// the extractor treats all of them as a signal to fall back.
    fn probe(&self, path: &Path) -> Result<ProbeMetadata>;

    /// Get the name of this probe (for logging)
    fn name(&self) -> &'static str;
}
