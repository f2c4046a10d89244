use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `trkpt` as read from the track log, before enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    pub heart_rate: Option<u16>,
    pub cadence: Option<u16>,
}

/// A lap recorded in the track log's `gpxdata:lap` extension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackLogLap {
    pub elapsed_time: f64,
    pub distance_m: f64,
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,
    pub calories: Option<i64>,
    pub avg_hr: Option<i64>,
    pub max_hr: Option<i64>,
    pub max_speed: Option<f64>,
    pub trigger: Option<String>,
    pub intensity: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum FileFormat {
    Gpx,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Gpx => "gpx",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedTrackLog {
    pub points: Vec<RawTrackPoint>,
    pub laps: Vec<TrackLogLap>,
    pub file_format: FileFormat,
}

/// An enriched trackpoint. Distances in km, times in seconds, speeds in km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub elapsed_distance: f64,
    pub time_elapsed: f64,
    pub elevation: Option<f64>,
    pub corrected_elevation: Option<f64>,
    pub heart_rate: Option<u16>,
    pub cadence: Option<u16>,
    pub velocity: f64,
}

#[derive(Debug, Clone)]
pub struct TrackLog {
    pub points: Vec<TrackPoint>,
    pub laps: Vec<TrackLogLap>,
    /// Total distance in km, from laps when the log carries them.
    pub total_distance: f64,
    pub total_distance_points: f64,
    pub total_time_laps: f64,
    pub total_time_points: f64,
}
