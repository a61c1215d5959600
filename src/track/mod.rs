//! GPX track reading
//!
//! Extracts named, timestamped waypoints from GPX 1.0 and 1.1 documents.

pub mod parser;

pub use parser::{parse_gpx_bytes, parse_gpx_file, parse_gpx_str, TrackParse};
