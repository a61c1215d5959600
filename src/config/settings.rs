//! Runtime configuration settings

use crate::matching::MatchConfig;
use crate::probe::ProbeConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for a correlation run
#[derive(Debug, Clone)]
pub struct Settings {
    /// GPX file with the waypoints
    pub gpx_file: PathBuf,
    /// Directory holding the videos
    pub video_dir: PathBuf,
    /// CSV output file
    pub output: PathBuf,
    /// Optional JSON output file
    pub json_output: Option<PathBuf>,
    /// Scan the video directory recursively
    pub recursive: bool,
    /// Naming-key matching parameters
    pub matching: MatchConfig,
    /// External probe selection and timeout
    pub probe: ProbeConfig,
    /// Number of metadata worker threads
    pub threads: usize,
    /// Show progress bars
    pub show_progress: bool,
    /// Dry run mode - list inputs without writing
    pub dry_run: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            gpx_file: cli.gpx_file.clone(),
            video_dir: cli.video_dir.clone(),
            output: cli.output.clone(),
            json_output: cli.json.clone(),
            recursive: !cli.no_recursive,
            matching: MatchConfig {
                min_token_len: cli.min_token_len as usize,
            },
            probe: ProbeConfig {
                enabled: !cli.no_probe,
                ffprobe_path: cli.ffprobe.clone(),
                timeout: Duration::from_secs(cli.probe_timeout),
            },
            threads: cli.threads.unwrap_or_else(default_threads).max(1),
            show_progress: !cli.quiet,
            dry_run: cli.dry_run,
        }
    }
}

fn default_threads() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gpx_file: PathBuf::from("waypoints.gpx"),
            video_dir: PathBuf::from("."),
            output: PathBuf::from(super::cli::DEFAULT_OUTPUT),
            json_output: None,
            recursive: true,
            matching: MatchConfig::default(),
            probe: ProbeConfig::default(),
            threads: default_threads(),
            show_progress: true,
            dry_run: false,
        }
    }
}
