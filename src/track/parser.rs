//! Streaming GPX waypoint parser
//!
//! Elements are matched by local name only, which makes GPX 1.0, GPX 1.1,
//! prefixed (`<gpx:wpt>`) and namespace-less documents parse identically.

use crate::error::{CorrelatorError, Result};
use crate::timestamp::parse_timestamp;
use crate::types::Waypoint;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use tracing::{debug, warn};

/// Waypoints extracted from a track file
#[derive(Debug, Clone, Default)]
pub struct TrackParse {
    /// Accepted waypoints in document order
    pub waypoints: Vec<Waypoint>,
    /// Waypoints dropped for lacking a name or a usable timestamp
    pub skipped: usize,
}

/// Child elements of `<wpt>` that we read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Time,
    Desc,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"name" => Some(Field::Name),
            b"time" => Some(Field::Time),
            b"desc" => Some(Field::Desc),
            _ => None,
        }
    }
}

/// Partially read `<wpt>` element
#[derive(Debug, Default)]
struct WaypointDraft {
    /// Element depth of the `<wpt>` start tag
    depth: usize,
    lat: f64,
    lon: f64,
    name: Option<String>,
    time: Option<String>,
    desc: Option<String>,
    capture: Option<Field>,
    text: String,
}

impl WaypointDraft {
    fn begin(
        start: &BytesStart,
        depth: usize,
        reader: &Reader<&[u8]>,
    ) -> std::result::Result<Self, String> {
        let mut draft = WaypointDraft {
            depth,
            ..Default::default()
        };

        for attr in start.attributes() {
            let attr = attr.map_err(|e| format!("bad attribute on <wpt>: {}", e))?;
            let value = attr
                .decode_and_unescape_value(reader)
                .map_err(|e| format!("bad attribute value on <wpt>: {}", e))?;
            // Unparseable coordinates fall back to 0.0 rather than dropping the waypoint
            match attr.key.local_name().as_ref() {
                b"lat" => draft.lat = value.trim().parse().unwrap_or(0.0),
                b"lon" => draft.lon = value.trim().parse().unwrap_or(0.0),
                _ => {}
            }
        }

        Ok(draft)
    }

    fn finish_field(&mut self) {
        let Some(field) = self.capture.take() else {
            return;
        };
        let text = std::mem::take(&mut self.text).trim().to_string();
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Time => &mut self.time,
            Field::Desc => &mut self.desc,
        };
        // First occurrence wins
        if slot.is_none() && !text.is_empty() {
            *slot = Some(text);
        }
    }

    fn into_waypoint(self, index: usize) -> Result<Waypoint> {
        let name = self.name.ok_or_else(|| CorrelatorError::MissingData {
            index,
            reason: "missing <name>".to_string(),
        })?;

        let raw_time = self.time.ok_or_else(|| CorrelatorError::MissingData {
            index,
            reason: format!("'{}' has no <time>", name),
        })?;

        let timestamp = parse_timestamp(&raw_time).ok_or_else(|| CorrelatorError::MissingData {
            index,
            reason: format!("'{}' has unparseable <time> '{}'", name, raw_time),
        })?;

        Ok(Waypoint {
            name,
            lat: self.lat,
            lon: self.lon,
            timestamp,
            description: self.desc,
        })
    }
}

/// Parse a GPX file from disk
pub fn parse_gpx_file(path: &Path) -> Result<TrackParse> {
    let content = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CorrelatorError::InputNotFound(path.to_path_buf()),
        _ => CorrelatorError::parse_error(path, format!("cannot read file: {}", e)),
    })?;

    let parsed = parse_events(Reader::from_reader(content.as_slice()))
        .map_err(|reason| CorrelatorError::parse_error(path, reason))?;

    debug!(
        "Parsed {} waypoints from {} ({} skipped)",
        parsed.waypoints.len(),
        path.display(),
        parsed.skipped
    );

    Ok(parsed)
}

/// Parse GPX content held in memory
///
/// Fails only when the document is not well-formed. Waypoints missing their
/// name or timestamp are logged, counted in [`TrackParse::skipped`] and dropped.
pub fn parse_gpx_str(xml: &str) -> Result<TrackParse> {
    parse_events(Reader::from_str(xml))
        .map_err(|reason| CorrelatorError::parse_error("<memory>", reason))
}

/// Parse raw GPX bytes, honoring a BOM or the encoding in the XML declaration
pub fn parse_gpx_bytes(xml: &[u8]) -> Result<TrackParse> {
    parse_events(Reader::from_reader(xml))
        .map_err(|reason| CorrelatorError::parse_error("<memory>", reason))
}

fn parse_events(mut reader: Reader<&[u8]>) -> std::result::Result<TrackParse, String> {
    reader.trim_text(true);

    let mut result = TrackParse::default();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut candidates = 0usize;
    let mut draft: Option<WaypointDraft> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{} (at byte {})", e, reader.buffer_position()))?;

        match event {
            Event::Start(start) => {
                if depth == 0 && saw_root {
                    return Err("multiple root elements".to_string());
                }
                saw_root = true;
                depth += 1;

                let local = start.local_name();
                if let Some(wpt) = draft.as_mut() {
                    if depth == wpt.depth + 1 {
                        wpt.capture = Field::from_local_name(local.as_ref());
                    }
                } else if local.as_ref() == b"wpt" {
                    draft = Some(WaypointDraft::begin(&start, depth, &reader)?);
                }
            }
            Event::Empty(start) => {
                if depth == 0 && saw_root {
                    return Err("multiple root elements".to_string());
                }
                saw_root = true;

                // A self-closing <wpt/> can never carry a name
                if draft.is_none() && start.local_name().as_ref() == b"wpt" {
                    candidates += 1;
                    let err = CorrelatorError::MissingData {
                        index: candidates,
                        reason: "empty <wpt/> element".to_string(),
                    };
                    warn!("{}", err);
                    result.skipped += 1;
                }
            }
            Event::Text(text) => {
                if depth == 0 {
                    return Err("text outside of the root element".to_string());
                }
                if let Some(wpt) = draft.as_mut() {
                    if wpt.capture.is_some() {
                        let text = text.unescape().map_err(|e| format!("bad text: {}", e))?;
                        wpt.text.push_str(&text);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(wpt) = draft.as_mut() {
                    if wpt.capture.is_some() {
                        let text = reader
                            .decoder()
                            .decode(&data)
                            .map_err(|e| format!("bad CDATA: {}", e))?;
                        wpt.text.push_str(&text);
                    }
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err("unexpected closing tag".to_string());
                }

                match draft.as_ref().map(|wpt| wpt.depth) {
                    Some(wpt_depth) if depth == wpt_depth + 1 => {
                        if let Some(wpt) = draft.as_mut() {
                            wpt.finish_field();
                        }
                    }
                    Some(wpt_depth) if depth == wpt_depth => {
                        candidates += 1;
                        if let Some(finished) = draft.take() {
                            match finished.into_waypoint(candidates) {
                                Ok(waypoint) => result.waypoints.push(waypoint),
                                Err(e) => {
                                    warn!("{}", e);
                                    result.skipped += 1;
                                }
                            }
                        }
                    }
                    _ => {}
                }

                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err("document has no root element".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document (unclosed elements)".to_string());
    }

    Ok(result)
}
