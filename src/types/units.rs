use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

pub const KM_TO_MILES: f64 = 0.621371192;
pub const M_TO_FEET: f64 = 3.2808399;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

impl MeasurementSystem {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "false" => Some(MeasurementSystem::Metric),
            "imperial" | "us" | "true" => Some(MeasurementSystem::Imperial),
            _ => None,
        }
    }

    pub fn is_imperial(&self) -> bool {
        matches!(self, MeasurementSystem::Imperial)
    }
}

/// Which unit label a value is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Distance,
    Speed,
    Pace,
    Elevation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitLabels {
    pub distance: String,
    pub speed: String,
    pub pace: String,
    pub elevation: String,
}

impl UnitLabels {
    pub fn new(system: MeasurementSystem, catalog: &dyn Catalog) -> Self {
        let (distance, speed, pace, elevation) = match system {
            MeasurementSystem::Imperial => ("miles", "miles/h", "min/mile", "feet"),
            MeasurementSystem::Metric => ("km", "km/h", "min/km", "m"),
        };
        Self {
            distance: catalog.translate(distance),
            speed: catalog.translate(speed),
            pace: catalog.translate(pace),
            elevation: catalog.translate(elevation),
        }
    }

    pub fn label(&self, kind: UnitKind) -> &str {
        match kind {
            UnitKind::Distance => &self.distance,
            UnitKind::Speed => &self.speed,
            UnitKind::Pace => &self.pace,
            UnitKind::Elevation => &self.elevation,
        }
    }
}

pub fn km_to_miles(km: f64) -> f64 {
    km * KM_TO_MILES
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles / KM_TO_MILES
}

pub fn m_to_feet(m: f64) -> f64 {
    m * M_TO_FEET
}

pub fn feet_to_m(feet: f64) -> f64 {
    feet / M_TO_FEET
}

/// Converts a min/km pace to min/mile. Works on the raw stored float, so the
/// `minutes.seconds` encoding is scaled as if it were decimal.
pub fn pace_km_to_miles(pace: f64) -> f64 {
    pace / KM_TO_MILES
}

pub fn pace_miles_to_km(pace: f64) -> f64 {
    pace * KM_TO_MILES
}

/// Applies the metric-to-display conversion for one kind of value.
pub fn to_display(system: MeasurementSystem, kind: UnitKind, value: f64) -> f64 {
    if !system.is_imperial() {
        return value;
    }
    match kind {
        UnitKind::Distance | UnitKind::Speed => km_to_miles(value),
        UnitKind::Pace => pace_km_to_miles(value),
        UnitKind::Elevation => m_to_feet(value),
    }
}

/// Inverse of [`to_display`].
pub fn from_display(system: MeasurementSystem, kind: UnitKind, value: f64) -> f64 {
    if !system.is_imperial() {
        return value;
    }
    match kind {
        UnitKind::Distance | UnitKind::Speed => miles_to_km(value),
        UnitKind::Pace => pace_miles_to_km(value),
        UnitKind::Elevation => feet_to_m(value),
    }
}
