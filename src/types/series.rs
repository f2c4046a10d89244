use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Elevation,
    CorrectedElevation,
    Speed,
    Pace,
    HeartRate,
    HeartRatePercent,
    Cadence,
    HeartRateZone,
    PaceByLap,
    SpeedByLap,
}

impl SeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Elevation => "elevation",
            SeriesKind::CorrectedElevation => "corrected_elevation",
            SeriesKind::Speed => "speed",
            SeriesKind::Pace => "pace",
            SeriesKind::HeartRate => "heart_rate",
            SeriesKind::HeartRatePercent => "heart_rate_percent",
            SeriesKind::Cadence => "cadence",
            SeriesKind::HeartRateZone => "heart_rate_zone",
            SeriesKind::PaceByLap => "pace_by_lap",
            SeriesKind::SpeedByLap => "speed_by_lap",
        }
    }
}

/// The x axis a series is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Distance,
    Time,
}

impl Axis {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "distance" => Some(Axis::Distance),
            "time" => Some(Axis::Time),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    #[default]
    Line,
    Bar,
    VerticalSpan,
    HorizontalSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub line_color: Option<String>,
    pub fill_color: Option<String>,
    pub graph_type: GraphType,
    /// Drawn on the primary y axis when the chart first opens.
    pub show_on_y1: bool,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            line_color: None,
            fill_color: None,
            graph_type: GraphType::Line,
            show_on_y1: false,
            points: Vec::new(),
        }
    }

    pub fn marker() -> Self {
        Self::new("", "", "")
            .with_color(Some("#CCFF00"))
            .with_graph_type(GraphType::VerticalSpan)
    }

    pub fn with_color(mut self, color: Option<&str>) -> Self {
        self.line_color = color.map(str::to_string);
        self.fill_color = color.map(str::to_string);
        self
    }

    pub fn with_graph_type(mut self, graph_type: GraphType) -> Self {
        self.graph_type = graph_type;
        self
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push(SeriesPoint {
            x,
            y,
            label: None,
            color: None,
        });
    }

    /// Adds a point only when the reading exists.
    pub fn add_reading(&mut self, x: f64, y: Option<f64>) {
        if let Some(y) = y {
            self.add_point(x, y);
        }
    }

    pub fn add_band(&mut self, lower: f64, upper: f64, label: &str, color: &str) {
        self.points.push(SeriesPoint {
            x: lower,
            y: upper,
            label: Some(label.to_string()),
            color: Some(color.to_string()),
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub type SeriesMap = BTreeMap<SeriesKind, Series>;

/// Removes every series that ended up without points.
pub fn drop_empty(map: &mut SeriesMap, axis: Axis) {
    map.retain(|kind, series| {
        if series.is_empty() {
            tracing::debug!("No values for {} ({:?}). Removing", kind.as_str(), axis);
            false
        } else {
            true
        }
    });
}
