//! Per-video metadata resolution with filesystem fallback

use super::traits::MetadataProbe;
use crate::discovery::DiscoveredVideo;
use crate::error::CorrelatorError;
use crate::types::{MetadataSource, Video};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

/// Resolve creation time and duration for one video
///
/// Never fails: probe problems route to the filesystem timestamp, and a file
/// with no usable timestamp at all comes back with `creation_time: None`.
pub fn extract_video(path: &Path, probe: Option<&dyn MetadataProbe>) -> Video {
    let mut video = Video::unresolved(path.to_path_buf());

    if let Some(probe) = probe {
        match probe.probe(path) {
            Ok(meta) => {
                video.duration_seconds = meta.duration_seconds;
                if let Some(created) = meta.creation_time {
                    video.creation_time = Some(created);
                    video.metadata_source = MetadataSource::Probe;
                    debug!("{}: creation time {} via {}", video.filename, created, probe.name());
                    return video;
                }
                debug!(
                    "{}: {} reported no creation time, using filesystem timestamp",
                    video.filename,
                    probe.name()
                );
            }
            Err(e @ CorrelatorError::ProbeTimeout { .. }) => {
                warn!("{}; using filesystem timestamp", e);
            }
            Err(e) if e.is_probe_error() => {
                debug!("{}; using filesystem timestamp", e);
            }
            Err(e) => {
                warn!("Unexpected probe error for {}: {}", path.display(), e);
            }
        }
    }

    match filesystem_timestamp(path) {
        Some(ts) => {
            video.creation_time = Some(ts);
            video.metadata_source = MetadataSource::Filesystem;
        }
        None => {
            warn!("No usable timestamp for {}", path.display());
        }
    }

    video
}

/// Earliest of the file's creation and modification times, in UTC
///
/// Platforms that do not record a birth time only contribute the mtime.
pub fn filesystem_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = std::fs::metadata(path).ok()?;

    [metadata.created().ok(), metadata.modified().ok()]
        .into_iter()
        .flatten()
        .map(DateTime::<Utc>::from)
        .min()
}

/// Resolve metadata for every discovered video in parallel
///
/// Runs on the current rayon pool. Output order matches `files` regardless of
/// which probe finishes first.
pub fn extract_all(
    files: &[DiscoveredVideo],
    probe: Option<&dyn MetadataProbe>,
    show_progress: bool,
) -> Vec<Video> {
    let progress_bar = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let videos: Vec<Video> = files
        .par_iter()
        .map(|file| {
            let video = extract_video(&file.path, probe);
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
                pb.set_message(video.filename.clone());
            }
            video
        })
        .collect();

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Metadata extraction complete");
    }

    videos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::probe::ProbeMetadata;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    struct FixedProbe {
        meta: ProbeMetadata,
        calls: AtomicUsize,
    }

    impl MetadataProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> Result<ProbeMetadata> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.meta)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct TimeoutProbe;

    impl MetadataProbe for TimeoutProbe {
        fn probe(&self, path: &Path) -> Result<ProbeMetadata> {
            Err(CorrelatorError::ProbeTimeout {
                path: path.to_path_buf(),
                timeout: Duration::from_secs(1),
            })
        }

        fn name(&self) -> &'static str {
            "timeout"
        }
    }

    fn video_file(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_probe_result_is_used() {
        let dir = TempDir::new().unwrap();
        let path = video_file(&dir, "site_001_recording.mp4");
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 25, 0).unwrap();
        let probe = FixedProbe {
            meta: ProbeMetadata {
                creation_time: Some(created),
                duration_seconds: Some(300.0),
            },
            calls: AtomicUsize::new(0),
        };

        let video = extract_video(&path, Some(&probe));
        assert_eq!(video.creation_time, Some(created));
        assert_eq!(video.duration_seconds, Some(300.0));
        assert_eq!(video.metadata_source, MetadataSource::Probe);
        assert_eq!(video.filename, "site_001_recording.mp4");
    }

    #[test]
    fn test_no_probe_uses_filesystem_time() {
        let dir = TempDir::new().unwrap();
        let path = video_file(&dir, "clip.mov");

        let video = extract_video(&path, None);
        assert_eq!(video.creation_time, filesystem_timestamp(&path));
        assert!(video.creation_time.is_some());
        assert_eq!(video.duration_seconds, None);
        assert_eq!(video.metadata_source, MetadataSource::Filesystem);
    }

    #[test]
    fn test_timeout_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = video_file(&dir, "clip.mkv");

        let video = extract_video(&path, Some(&TimeoutProbe));
        assert_eq!(video.creation_time, filesystem_timestamp(&path));
        assert_eq!(video.duration_seconds, None);
        assert_eq!(video.metadata_source, MetadataSource::Filesystem);
    }

    #[test]
    fn test_probe_without_creation_time_keeps_duration() {
        let dir = TempDir::new().unwrap();
        let path = video_file(&dir, "clip.avi");
        let probe = FixedProbe {
            meta: ProbeMetadata {
                creation_time: None,
                duration_seconds: Some(12.5),
            },
            calls: AtomicUsize::new(0),
        };

        let video = extract_video(&path, Some(&probe));
        assert_eq!(video.duration_seconds, Some(12.5));
        assert_eq!(video.metadata_source, MetadataSource::Filesystem);
    }

    #[test]
    fn test_missing_file_is_unresolved() {
        let video = extract_video(Path::new("/no/such/clip.mp4"), None);
        assert_eq!(video.creation_time, None);
        assert_eq!(video.metadata_source, MetadataSource::Unresolved);
    }

    #[test]
    fn test_extract_all_preserves_order() {
        let dir = TempDir::new().unwrap();
        let files: Vec<DiscoveredVideo> = (0..16)
            .map(|i| DiscoveredVideo {
                path: video_file(&dir, &format!("clip_{:02}.mp4", i)),
                format: crate::types::VideoFormat::Mp4,
                size_bytes: 0,
            })
            .collect();
        let probe = FixedProbe {
            meta: ProbeMetadata::default(),
            calls: AtomicUsize::new(0),
        };

        let videos = extract_all(&files, Some(&probe), false);
        assert_eq!(probe.calls.load(Ordering::Relaxed), 16);
        for (i, video) in videos.iter().enumerate() {
            assert_eq!(video.filename, format!("clip_{:02}.mp4", i));
        }
    }
}
