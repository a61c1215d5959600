//! Video metadata extraction
//!
//! Container metadata comes from an external probe (ffprobe) when one is
//! available; otherwise, or when it fails or times out, the filesystem
//! timestamp stands in and the duration stays unknown.

pub mod command;
pub mod extractor;
pub mod ffprobe;
pub mod traits;

pub use extractor::{extract_all, extract_video, filesystem_timestamp};
pub use ffprobe::FfprobeProbe;
pub use traits::{MetadataProbe, ProbeMetadata};

use crate::error::CorrelatorError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Default upper bound for a single probe invocation
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Probe selection and limits
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Use the external probe at all
    pub enabled: bool,
    /// Explicit ffprobe binary; `None` searches `PATH`
    pub ffprobe_path: Option<PathBuf>,
    /// Per-file timeout; exceeding it is treated like a missing probe
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ffprobe_path: None,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Build the configured probe, or `None` when it is disabled or missing
pub fn resolve_probe(config: &ProbeConfig) -> Option<Box<dyn MetadataProbe>> {
    if !config.enabled {
        info!("Metadata probe disabled, using filesystem timestamps");
        return None;
    }

    let probe = match &config.ffprobe_path {
        // Accepts a bare program name on PATH as well as a path to the binary
        Some(path) => which::which(path)
            .ok()
            .map(|resolved| FfprobeProbe::new(resolved, config.timeout)),
        None => FfprobeProbe::from_path(config.timeout),
    };

    match probe {
        Some(probe) => {
            info!("Using {} for video metadata", probe.ffprobe_path().display());
            Some(Box::new(probe))
        }
        None => {
            let tool = config
                .ffprobe_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ffprobe::FFPROBE.to_string());
            warn!(
                "{}\n  Falling back to filesystem timestamps; video durations will be empty",
                CorrelatorError::ProbeUnavailable { tool }
            );
            None
        }
    }
}
