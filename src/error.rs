//! Unified error types for wpcorr
//!
//! Error strategy:
//! - Per-waypoint and per-video errors (missing data, probe trouble): Recoverable,
//!   skip or fall back and continue
//! - Input and output errors (malformed GPX, missing directory, write failure):
//!   Fatal, abort the run before any output is written
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Video container extensions recognized during discovery, for error messages
pub const SUPPORTED_VIDEO_FORMATS: &str = "MP4, AVI, MOV, MKV, WMV, FLV, WEBM, M4V";

/// Top-level error type for wpcorr operations
#[derive(Debug, Error)]
pub enum CorrelatorError {
    // =========================================================================
    // Recoverable errors - skip waypoint or fall back, continue the run
    // =========================================================================
    #[error("Waypoint #{index} skipped: {reason}")]
    MissingData { index: usize, reason: String },

    #[error("Metadata probe '{tool}' is not available\n  Tip: Install ffmpeg (which ships ffprobe) or pass --ffprobe /path/to/ffprobe")]
    ProbeUnavailable { tool: String },

    #[error("Metadata probe timed out after {}s for '{path}'", .timeout.as_secs_f64())]
    ProbeTimeout { path: PathBuf, timeout: Duration },

    #[error("Metadata probe failed for '{path}': {reason}")]
    ProbeFailed { path: PathBuf, reason: String },

    // =========================================================================
    // Fatal errors - abort the run
    // =========================================================================
    #[error("Failed to parse GPX file '{path}': {reason}\n  Tip: Check that the file is a complete GPX 1.0 or 1.1 document")]
    Parse { path: PathBuf, reason: String },

    #[error("Input not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    InputNotFound(PathBuf),

    #[error("Video path is not a directory: '{0}'\n  Supported formats inside it: {SUPPORTED_VIDEO_FORMATS}")]
    NotADirectory(PathBuf),

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for wpcorr operations
pub type Result<T> = std::result::Result<T, CorrelatorError>;

impl CorrelatorError {
    /// Returns true if this error is recoverable (skip or fall back, continue the run)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CorrelatorError::MissingData { .. }
                | CorrelatorError::ProbeUnavailable { .. }
                | CorrelatorError::ProbeTimeout { .. }
                | CorrelatorError::ProbeFailed { .. }
        )
    }

    /// Returns true if this error should route a video to the filesystem fallback
    pub fn is_probe_error(&self) -> bool {
        matches!(
            self,
            CorrelatorError::ProbeUnavailable { .. }
                | CorrelatorError::ProbeTimeout { .. }
                | CorrelatorError::ProbeFailed { .. }
        )
    }

    /// Create a parse error for a GPX file
    pub fn parse_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CorrelatorError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a probe failure for a video file
    pub fn probe_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CorrelatorError::ProbeFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        CorrelatorError::OutputError { path, reason }
    }
}
