//! CLI argument parsing and configuration

use clap::Parser;
use std::path::PathBuf;

/// Default name of the correlation table
pub const DEFAULT_OUTPUT: &str = "waypoint_video_correlation.csv";

/// wpcorr - Correlate GPX waypoints with field-recorded videos
///
/// Matches each waypoint to a video whose file name shares its naming key
/// and writes a CSV table with the waypoint's offset into the recording.
#[derive(Parser, Debug)]
#[command(name = "wpcorr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// GPX file containing the waypoints
    #[arg(value_name = "GPX_FILE")]
    pub gpx_file: PathBuf,

    /// Directory containing the video files
    #[arg(value_name = "VIDEO_DIR")]
    pub video_dir: PathBuf,

    /// Output CSV file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write the correlation as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Only look at videos directly inside VIDEO_DIR
    #[arg(long, default_value = "false")]
    pub no_recursive: bool,

    /// Minimum token length used by token matching
    #[arg(long, value_name = "N", default_value_t = 3)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub min_token_len: u32,

    /// Seconds to wait for ffprobe on a single file before falling back
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout: u64,

    /// Path to the ffprobe executable (defaults to searching PATH)
    #[arg(long, value_name = "PATH", conflicts_with = "no_probe")]
    pub ffprobe: Option<PathBuf>,

    /// Skip ffprobe and use filesystem timestamps only
    #[arg(long, default_value = "false")]
    pub no_probe: bool,

    /// Number of metadata worker threads (defaults to CPU count - 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// List the waypoints and videos that would be correlated, write nothing
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
