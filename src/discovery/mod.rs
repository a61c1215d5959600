//! Video file discovery

pub mod scanner;

pub use scanner::{scan_videos, DiscoveredVideo};
