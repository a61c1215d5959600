//! Correlation pipeline

pub mod correlate;
pub mod orchestrator;

pub use correlate::{correlate, correlate_waypoint, Correlation};
pub use orchestrator::{run, run_with_probe, RunSummary};
