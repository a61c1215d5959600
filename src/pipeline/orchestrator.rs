//! Pipeline orchestration
//!
//! Coordinates GPX parsing, video discovery, parallel metadata extraction,
//! correlation and export. Nothing is written until every input has been read.

use super::correlate::{correlate, Correlation};
use crate::config::Settings;
use crate::discovery::{self, DiscoveredVideo};
use crate::error::{CorrelatorError, Result};
use crate::export::{self, ExportCounts};
use crate::probe::{self, MetadataProbe};
use crate::timestamp::format_timestamp;
use crate::track::{self, TrackParse};
use crate::types::{MetadataSource, Video};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pipeline result summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Waypoints that reached the correlation engine
    pub waypoints: usize,
    /// Waypoints dropped for missing name or timestamp
    pub skipped_waypoints: usize,
    pub videos: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Videos whose creation time came from the probe
    pub probed: usize,
    /// Videos whose creation time came from the filesystem
    pub filesystem_fallback: usize,
    /// Files written (empty on dry run)
    pub outputs: Vec<PathBuf>,
}

/// Run the full correlation pipeline with the configured probe
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let probe = probe::resolve_probe(&settings.probe);
    run_with_probe(settings, probe.as_deref())
}

/// Run the pipeline with an explicit probe (`None` = filesystem timestamps only)
pub fn run_with_probe(
    settings: &Settings,
    probe: Option<&dyn MetadataProbe>,
) -> Result<RunSummary> {
    let pipeline_start = Instant::now();

    // Phase 1: Waypoints
    info!("Parsing GPX file: {}", settings.gpx_file.display());
    let TrackParse { waypoints, skipped } = track::parse_gpx_file(&settings.gpx_file)?;
    info!("Found {} waypoints ({} skipped)", waypoints.len(), skipped);
    if waypoints.is_empty() {
        warn!("No usable waypoints in {}", settings.gpx_file.display());
    }

    // Phase 2: Discovery
    let discovery_start = Instant::now();
    info!("Scanning video directory: {}", settings.video_dir.display());
    let files = discovery::scan_videos(&settings.video_dir, settings.recursive)?;
    info!(
        "Found {} video files in {:.2}s",
        files.len(),
        discovery_start.elapsed().as_secs_f64()
    );

    if settings.dry_run {
        return Ok(run_dry_run(&waypoints, skipped, &files, settings));
    }

    // Phase 3: Metadata
    let metadata_start = Instant::now();
    let pool = build_thread_pool(settings.threads)?;
    let videos = pool.install(|| probe::extract_all(&files, probe, settings.show_progress));
    info!(
        "Metadata extraction completed in {:.2}s",
        metadata_start.elapsed().as_secs_f64()
    );

    // Phase 4: Correlation
    let correlation = correlate(&waypoints, &videos, &settings.matching);
    info!(
        "Correlated {} waypoints: {} matched, {} unmatched",
        correlation.records.len(),
        correlation.matched,
        correlation.unmatched
    );

    // Phase 5: Export
    let counts = ExportCounts {
        matched: correlation.matched,
        unmatched: correlation.unmatched,
        skipped_waypoints: skipped,
    };
    let outputs = export_results(&correlation, counts, settings)?;

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(RunSummary {
        waypoints: waypoints.len(),
        skipped_waypoints: skipped,
        videos: videos.len(),
        matched: correlation.matched,
        unmatched: correlation.unmatched,
        probed: count_source(&videos, MetadataSource::Probe),
        filesystem_fallback: count_source(&videos, MetadataSource::Filesystem),
        outputs,
    })
}

fn count_source(videos: &[Video], source: MetadataSource) -> usize {
    videos.iter().filter(|v| v.metadata_source == source).count()
}

/// Dry run mode - show what would be correlated without probing or writing
fn run_dry_run(
    waypoints: &[crate::types::Waypoint],
    skipped: usize,
    files: &[DiscoveredVideo],
    settings: &Settings,
) -> RunSummary {
    println!();
    println!("=== DRY RUN MODE ===");
    println!();

    println!("Waypoints ({}, {} skipped):", waypoints.len(), skipped);
    for wpt in waypoints {
        println!("  {}  {}", format_timestamp(&wpt.timestamp), wpt.name);
    }
    println!();

    println!("Videos ({}):", files.len());
    for file in files {
        let size_mb = file.size_bytes as f64 / (1024.0 * 1024.0);
        println!(
            "  {} ({}, {:.1} MB)",
            file.path.display(),
            file.format.as_str(),
            size_mb
        );
    }
    println!();

    println!("Would create:");
    println!("  {}", settings.output.display());
    if let Some(ref json) = settings.json_output {
        println!("  {}", json.display());
    }
    println!();

    RunSummary {
        waypoints: waypoints.len(),
        skipped_waypoints: skipped,
        videos: files.len(),
        ..Default::default()
    }
}

/// Build a dedicated Rayon pool for metadata extraction
fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| {
            CorrelatorError::ConfigError(format!("Failed to configure thread pool: {}", e))
        })?;
    debug!("Configured thread pool with {} threads", num_threads);
    Ok(pool)
}

/// Export correlation results
fn export_results(
    correlation: &Correlation,
    counts: ExportCounts,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    export::write_outputs(
        &correlation.records,
        counts,
        &settings.output,
        settings.json_output.as_deref(),
    )
}
