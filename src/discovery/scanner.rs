//! Video file discovery and scanning

use crate::error::{CorrelatorError, Result};
use crate::types::VideoFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Discovered video file with basic metadata
#[derive(Debug, Clone)]
pub struct DiscoveredVideo {
    /// Absolute path
    pub path: PathBuf,
    pub format: VideoFormat,
    pub size_bytes: u64,
}

/// Scan a directory for video files
///
/// The returned paths are absolute and sorted, so downstream matching sees the
/// same order regardless of filesystem enumeration order.
pub fn scan_videos(dir: &Path, recursive: bool) -> Result<Vec<DiscoveredVideo>> {
    if !dir.exists() {
        return Err(CorrelatorError::InputNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(CorrelatorError::NotADirectory(dir.to_path_buf()));
    }

    let root = dir.canonicalize()?;

    let walker = if recursive {
        WalkDir::new(&root)
    } else {
        WalkDir::new(&root).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker.into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() {
            if let Some(file) = try_discover_video(path) {
                debug!("Discovered: {}", file.path.display());
                files.push(file);
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    info!("Discovered {} video files", files.len());

    if files.is_empty() {
        warn!("No supported video files found in {}", root.display());
    }

    Ok(files)
}

/// Try to create a DiscoveredVideo if the path is a supported video format
fn try_discover_video(path: &Path) -> Option<DiscoveredVideo> {
    let ext = path.extension()?.to_str()?;
    let format = VideoFormat::from_extension(ext)?;

    let metadata = std::fs::metadata(path).ok()?;

    Some(DiscoveredVideo {
        path: path.to_path_buf(),
        format,
        size_bytes: metadata.len(),
    })
}
