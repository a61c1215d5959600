//! Waypoint-to-video correlation and offset computation

use crate::matching::{find_match, MatchConfig};
use crate::timestamp::{format_offset, offset_seconds};
use crate::types::{CorrelationRecord, Video, Waypoint};
use tracing::debug;

/// Correlation output with summary counts
#[derive(Debug, Clone, Default)]
pub struct Correlation {
    /// One record per waypoint, in waypoint order
    pub records: Vec<CorrelationRecord>,
    pub matched: usize,
    pub unmatched: usize,
}

/// Correlate every waypoint against the full video set
pub fn correlate(waypoints: &[Waypoint], videos: &[Video], config: &MatchConfig) -> Correlation {
    let records: Vec<CorrelationRecord> = waypoints
        .iter()
        .map(|wpt| correlate_waypoint(wpt, videos, config))
        .collect();

    let matched = records.iter().filter(|r| r.is_matched()).count();
    let unmatched = records.len() - matched;

    Correlation {
        records,
        matched,
        unmatched,
    }
}

/// Build the record for a single waypoint
///
/// A match whose video has no creation time cannot yield an offset, so it is
/// reported the same way as no match at all.
pub fn correlate_waypoint(
    waypoint: &Waypoint,
    videos: &[Video],
    config: &MatchConfig,
) -> CorrelationRecord {
    let Some(outcome) = find_match(&waypoint.name, videos, config) else {
        debug!("{}: no matching video", waypoint.name);
        return CorrelationRecord::unmatched(waypoint.clone());
    };

    let video = &videos[outcome.index];
    let Some(created) = video.creation_time else {
        debug!(
            "{}: matched {} ({}) but its creation time is unknown",
            waypoint.name,
            video.filename,
            outcome.strategy.as_str()
        );
        return CorrelationRecord::unmatched(waypoint.clone());
    };

    let offset = offset_seconds(&waypoint.timestamp, &created);
    debug!(
        "{}: matched {} ({}), offset {:.3}s",
        waypoint.name,
        video.filename,
        outcome.strategy.as_str(),
        offset
    );

    CorrelationRecord {
        waypoint: waypoint.clone(),
        video: Some(video.clone()),
        match_strategy: Some(outcome.strategy),
        time_offset_seconds: Some(offset),
        time_offset_formatted: Some(format_offset(offset)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchStrategy, MetadataSource};
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::PathBuf;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
    }

    fn waypoint(name: &str, ts: DateTime<Utc>) -> Waypoint {
        Waypoint {
            name: name.to_string(),
            lat: 46.5,
            lon: 6.6,
            timestamp: ts,
            description: None,
        }
    }

    fn video(filename: &str, created: Option<DateTime<Utc>>, duration: Option<f64>) -> Video {
        Video {
            filename: filename.to_string(),
            path: PathBuf::from("/videos").join(filename),
            creation_time: created,
            duration_seconds: duration,
            metadata_source: if created.is_some() {
                MetadataSource::Probe
            } else {
                MetadataSource::Unresolved
            },
        }
    }

    #[test]
    fn test_site_scenario() {
        let wpts = [waypoint("site_001", at(10, 30, 0))];
        let vids = [video("site_001_recording.mp4", Some(at(10, 25, 0)), Some(300.0))];

        let result = correlate(&wpts, &vids, &MatchConfig::default());
        assert_eq!(result.matched, 1);
        assert_eq!(result.unmatched, 0);

        let record = &result.records[0];
        assert_eq!(record.video.as_ref().unwrap().filename, "site_001_recording.mp4");
        assert_eq!(record.time_offset_seconds, Some(300.0));
        assert_eq!(record.time_offset_formatted.as_deref(), Some("00:05:00"));
        assert_eq!(record.match_strategy, Some(MatchStrategy::Contains));
    }

    #[test]
    fn test_waypoint_before_video_is_negative() {
        let wpts = [waypoint("site_002", at(10, 20, 0))];
        let vids = [video("site_002.mp4", Some(at(10, 25, 30)), None)];

        let record = &correlate(&wpts, &vids, &MatchConfig::default()).records[0];
        assert_eq!(record.time_offset_seconds, Some(-330.0));
        assert_eq!(record.time_offset_formatted.as_deref(), Some("-00:05:30"));
    }

    #[test]
    fn test_north_ridge_scenario_unmatched() {
        let wpts = [waypoint("north_ridge", at(11, 0, 0))];
        let vids = [
            video("site_001_recording.mp4", Some(at(10, 25, 0)), Some(300.0)),
            video("lake_shore.mov", Some(at(9, 0, 0)), None),
        ];

        let result = correlate(&wpts, &vids, &MatchConfig::default());
        assert_eq!(result.matched, 0);
        assert_eq!(result.unmatched, 1);
        let record = &result.records[0];
        assert_eq!(record.waypoint.name, "north_ridge");
        assert!(record.video.is_none());
        assert!(record.time_offset_seconds.is_none());
        assert!(record.time_offset_formatted.is_none());
    }

    #[test]
    fn test_unresolved_creation_time_is_unmatched() {
        let wpts = [waypoint("site_003", at(10, 0, 0))];
        let vids = [video("site_003.mp4", None, Some(10.0))];

        let result = correlate(&wpts, &vids, &MatchConfig::default());
        assert_eq!(result.unmatched, 1);
        assert!(result.records[0].video.is_none());
    }

    #[test]
    fn test_one_record_per_waypoint_in_order_and_shared_videos() {
        let wpts = [
            waypoint("camp_a", at(10, 0, 0)),
            waypoint("zzz", at(10, 1, 0)),
            waypoint("camp_b", at(10, 2, 0)),
        ];
        let vids = [video("camp_day1.mp4", Some(at(9, 0, 0)), None)];

        let result = correlate(&wpts, &vids, &MatchConfig::default());
        let names: Vec<_> = result.records.iter().map(|r| r.waypoint.name.as_str()).collect();
        assert_eq!(names, vec!["camp_a", "zzz", "camp_b"]);
        assert_eq!(result.matched, 2);
        assert_eq!(result.unmatched, 1);
        // The same video serves both camp waypoints
        assert_eq!(result.records[0].video, result.records[2].video);
    }

    #[test]
    fn test_empty_inputs() {
        let result = correlate(&[], &[], &MatchConfig::default());
        assert!(result.records.is_empty());
        assert_eq!(result.matched + result.unmatched, 0);
    }
}
