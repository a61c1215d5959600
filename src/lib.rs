//! wpcorr - Waypoint/Video Correlator
//!
//! A command-line utility that pairs GPX waypoints with field-recorded video
//! files by naming key, then reports how far into each recording the waypoint
//! was taken. Output is a CSV table (and optionally JSON).
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `track`: GPX waypoint extraction (GPX 1.0 and 1.1)
//! - `discovery`: Video file scanning
//! - `probe`: Video metadata via ffprobe, with filesystem fallback
//! - `matching`: Ordered naming-key strategies
//! - `pipeline`: Correlation and run orchestration
//! - `export`: CSV and JSON output
//!
//! # Example
//!
//! ```no_run
//! use wpcorr::{config::Settings, pipeline};
//!
//! let settings = Settings::default();
//! let summary = pipeline::run(&settings).expect("Correlation failed");
//! println!("{} of {} waypoints matched", summary.matched, summary.waypoints);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod matching;
pub mod pipeline;
pub mod probe;
pub mod timestamp;
pub mod track;
pub mod types;

// Re-export key types at crate root
pub use error::{CorrelatorError, Result};
pub use types::{CorrelationRecord, MatchStrategy, MetadataSource, Video, Waypoint};
