use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::types::units::MeasurementSystem;

/// Zone boundaries as fractions of max heart rate (or of heart-rate reserve
/// with the Karvonen method), lowest first.
const ZONE_FRACTIONS: [f64; 5] = [0.50, 0.60, 0.70, 0.80, 0.90];
const ZONE_COLORS: [&str; 5] = ["#ffff99", "#ffcc00", "#ff9900", "#ff6600", "#ff0000"];
const ZONE_LABELS: [&str; 5] = [
    "Moderate activity",
    "Weight Control",
    "Aerobic",
    "Anaerobic",
    "VO2 MAX",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartRateZone {
    pub lower: f64,
    pub upper: f64,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub measurement_system: MeasurementSystem,
    pub max_hr: Option<u16>,
    pub rest_hr: Option<u16>,
    pub age: Option<u16>,
    pub karvonen: bool,
}

impl Profile {
    pub fn from_config(config: &Config) -> Self {
        Self {
            measurement_system: config.measurement_system,
            max_hr: config.max_hr,
            rest_hr: config.rest_hr,
            age: config.age,
            karvonen: config.karvonen,
        }
    }

    /// Configured max heart rate, else the `220 - age` estimate.
    pub fn max_heart_rate(&self) -> Option<f64> {
        match (self.max_hr, self.age) {
            (Some(max), _) if max > 0 => Some(max as f64),
            (_, Some(age)) if age < 220 => Some(220.0 - age as f64),
            _ => None,
        }
    }

    /// Heart-rate zones, highest first. Empty when max heart rate is unknown.
    pub fn zones(&self, catalog: &dyn Catalog) -> Vec<HeartRateZone> {
        let Some(max_hr) = self.max_heart_rate() else {
            return Vec::new();
        };
        let rest_hr = if self.karvonen {
            self.rest_hr.map(|hr| hr as f64).unwrap_or(0.0)
        } else {
            0.0
        };
        let targets: Vec<f64> = ZONE_FRACTIONS
            .iter()
            .map(|fraction| (max_hr - rest_hr) * fraction + rest_hr)
            .collect();

        let mut zones: Vec<HeartRateZone> = targets
            .iter()
            .enumerate()
            .map(|(idx, lower)| HeartRateZone {
                lower: *lower,
                upper: targets.get(idx + 1).copied().unwrap_or(max_hr),
                color: ZONE_COLORS[idx].to_string(),
                label: catalog.translate(ZONE_LABELS[idx]),
            })
            .collect();
        zones.reverse();
        zones
    }
}
