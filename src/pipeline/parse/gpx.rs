use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::activity::{FileFormat, ParsedTrackLog, RawTrackPoint, TrackLogLap};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct GpxParser;

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedTrackLog, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut state = GpxState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    state.open(&e)?;
                }
                Ok(Event::Empty(e)) => {
                    state.open(&e)?;
                    let name = element_name(&e)?;
                    state.close(&name);
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    state.text(text.trim());
                }
                Ok(Event::End(e)) => {
                    let name = e.name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    state.close(name_str);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(ParsedTrackLog {
            points: state.points,
            laps: state.laps,
            file_format: FileFormat::Gpx,
        })
    }
}

#[derive(Default)]
struct GpxState {
    points: Vec<RawTrackPoint>,
    laps: Vec<TrackLogLap>,
    current_point: Option<RawTrackPoint>,
    current_lap: Option<TrackLogLap>,
    current_element: String,
    current_summary: Option<String>,
}

impl GpxState {
    fn open(&mut self, e: &BytesStart) -> Result<(), ParseError> {
        let name = element_name(e)?;

        match local_name(&name) {
            "trkpt" => {
                let (lat, lon) = lat_lon(e)?;
                if let (Some(lat), Some(lon)) = (lat, lon) {
                    self.current_point = Some(RawTrackPoint {
                        lat,
                        lon,
                        ..Default::default()
                    });
                }
            }
            "lap" => {
                self.current_lap = Some(TrackLogLap::default());
            }
            local @ ("startPoint" | "endPoint") => {
                let (lat, lon) = lat_lon(e)?;
                if let Some(lap) = self.current_lap.as_mut() {
                    if local == "startPoint" {
                        lap.start_lat = lat;
                        lap.start_lon = lon;
                    } else {
                        lap.end_lat = lat;
                        lap.end_lon = lon;
                    }
                }
            }
            "summary" => {
                self.current_summary = attribute(e, "name")?;
                self.current_element = "summary".to_string();
            }
            "trigger" => {
                let kind = attribute(e, "kind")?;
                if let Some(lap) = self.current_lap.as_mut() {
                    lap.trigger = kind;
                }
                self.current_element = "trigger".to_string();
            }
            other => {
                if self.current_point.is_some() || self.current_lap.is_some() {
                    self.current_element = other.to_string();
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(point) = self.current_point.as_mut() {
            match self.current_element.as_str() {
                "ele" => point.elevation = text.parse().ok(),
                "time" => point.time = text.parse::<DateTime<Utc>>().ok(),
                "hr" => point.heart_rate = text.parse().ok(),
                "cad" => point.cadence = text.parse().ok(),
                _ => {}
            }
        } else if let Some(lap) = self.current_lap.as_mut() {
            match self.current_element.as_str() {
                "elapsedTime" => lap.elapsed_time = text.parse().unwrap_or(0.0),
                "distance" => lap.distance_m = text.parse().unwrap_or(0.0),
                "calories" => lap.calories = text.parse().ok(),
                "intensity" => lap.intensity = Some(text.to_string()),
                "trigger" if lap.trigger.is_none() => lap.trigger = Some(text.to_string()),
                "summary" => match self.current_summary.as_deref() {
                    Some("AverageHeartRateBpm") => lap.avg_hr = parse_rounded(text),
                    Some("MaximumHeartRateBpm") => lap.max_hr = parse_rounded(text),
                    Some("MaximumSpeed") => lap.max_speed = text.parse().ok(),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn close(&mut self, name: &str) {
        match local_name(name) {
            "trkpt" => {
                if let Some(point) = self.current_point.take() {
                    self.points.push(point);
                }
            }
            "lap" => {
                if let Some(lap) = self.current_lap.take() {
                    self.laps.push(lap);
                }
            }
            "summary" => self.current_summary = None,
            _ => {}
        }
        self.current_element.clear();
    }
}

fn element_name(e: &BytesStart) -> Result<String, ParseError> {
    let name = e.name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

/// Strips a namespace prefix: `gpxtpx:hr` -> `hr`.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn attribute(e: &BytesStart, wanted: &str) -> Result<Option<String>, ParseError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        if key == wanted {
            let value = std::str::from_utf8(&attr.value)
                .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn lat_lon(e: &BytesStart) -> Result<(Option<f64>, Option<f64>), ParseError> {
    let lat = attribute(e, "lat")?.and_then(|v| v.parse().ok());
    let lon = attribute(e, "lon")?.and_then(|v| v.parse().ok());
    Ok((lat, lon))
}

fn parse_rounded(text: &str) -> Option<i64> {
    text.parse::<f64>().ok().map(|v| v.round() as i64)
}
