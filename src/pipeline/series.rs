use crate::catalog::Catalog;
use crate::profile::HeartRateZone;
use crate::types::activity::TrackPoint;
use crate::types::series::{drop_empty, Axis, GraphType, Series, SeriesKind, SeriesMap};
use crate::types::units::{to_display, MeasurementSystem, UnitKind, UnitLabels};

/// Everything series generation needs to label and convert values.
pub struct SeriesContext<'a> {
    pub system: MeasurementSystem,
    pub units: &'a UnitLabels,
    pub pace_limit: Option<f64>,
    pub catalog: &'a dyn Catalog,
}

impl SeriesContext<'_> {
    pub fn x_label(&self, axis: Axis) -> String {
        match axis {
            Axis::Distance => format!(
                "{} ({})",
                self.catalog.translate("Distance"),
                self.units.distance
            ),
            Axis::Time => self.catalog.translate("Time (seconds)"),
        }
    }

    pub fn y_label(&self, name: &str, unit: &str) -> String {
        format!("{} ({})", self.catalog.translate(name), unit)
    }

    pub fn display(&self, kind: UnitKind, value: f64) -> f64 {
        to_display(self.system, kind, value)
    }

    /// Paces above the sport's limit are spikes from near-zero speed.
    pub fn clamp_pace(&self, pace: f64) -> f64 {
        match self.pace_limit {
            Some(limit) if pace > limit => {
                tracing::debug!("Pace ({}) exceeds limit ({}). Setting to 0", pace, limit);
                0.0
            }
            _ => pace,
        }
    }

    /// One empty series per axis, labelled for that axis.
    pub fn series_pair(
        &self,
        title: &str,
        y_label: String,
        color: Option<&str>,
        graph_type: GraphType,
    ) -> (Series, Series) {
        let title = self.catalog.translate(title);
        let build = |axis: Axis| {
            Series::new(title.clone(), self.x_label(axis), y_label.clone())
                .with_color(color)
                .with_graph_type(graph_type)
        };
        (build(Axis::Distance), build(Axis::Time))
    }
}

/// `60 / velocity` in min/km, or 0 when velocity gives no usable pace.
pub fn point_pace(velocity: f64) -> f64 {
    if velocity > 0.0 && velocity.is_finite() {
        60.0 / velocity
    } else {
        0.0
    }
}

/// Heart rate as a percentage of max. Needs a reading; 0 without a max.
pub fn heart_rate_percent(heart_rate: Option<u16>, max_hr: Option<f64>) -> Option<f64> {
    let heart_rate = heart_rate? as f64;
    match max_hr {
        Some(max) if max > 0.0 => Some(heart_rate / max * 100.0),
        _ => Some(0.0),
    }
}

/// Builds the distance- and time-indexed series for every trackpoint.
pub fn point_series(
    points: &[TrackPoint],
    ctx: &SeriesContext,
    max_hr: Option<f64>,
    zones: &[HeartRateZone],
) -> (SeriesMap, SeriesMap) {
    let mut distance_series = SeriesMap::new();
    let mut time_series = SeriesMap::new();
    if points.is_empty() {
        tracing::debug!("No tracklist in activity");
        return (distance_series, time_series);
    }

    let units = ctx.units;
    let templates = [
        (SeriesKind::Elevation, "Elevation", ctx.y_label("Elevation", &units.elevation), "#ff0000"),
        (
            SeriesKind::CorrectedElevation,
            "Corrected Elevation",
            ctx.y_label("Corrected Elevation", &units.elevation),
            "#993333",
        ),
        (SeriesKind::Speed, "Speed", ctx.y_label("Speed", &units.speed), "#000000"),
        (SeriesKind::Pace, "Pace", ctx.y_label("Pace", &units.pace), "#0000ff"),
        (
            SeriesKind::HeartRate,
            "Heart Rate",
            ctx.y_label("Heart Rate", &ctx.catalog.translate("bpm")),
            "#00ff00",
        ),
        (
            SeriesKind::HeartRatePercent,
            "Heart Rate (% of max)",
            ctx.y_label("Heart Rate", "%"),
            "#00ff00",
        ),
        (
            SeriesKind::Cadence,
            "Cadence",
            ctx.y_label("Cadence", &ctx.catalog.translate("rpm")),
            "#cc00ff",
        ),
    ];
    for (kind, title, y_label, color) in templates {
        let (mut by_distance, mut by_time) =
            ctx.series_pair(title, y_label, Some(color), GraphType::Line);
        if kind == SeriesKind::Elevation {
            by_distance.show_on_y1 = true;
            by_time.show_on_y1 = true;
        }
        distance_series.insert(kind, by_distance);
        time_series.insert(kind, by_time);
    }

    for point in points {
        let pace = ctx.clamp_pace(point_pace(point.velocity));
        let x_distance = ctx.display(UnitKind::Distance, point.elapsed_distance);
        let x_time = point.time_elapsed;

        let readings = [
            (
                SeriesKind::Elevation,
                point.elevation.map(|e| ctx.display(UnitKind::Elevation, e)),
            ),
            (
                SeriesKind::CorrectedElevation,
                point
                    .corrected_elevation
                    .map(|e| ctx.display(UnitKind::Elevation, e)),
            ),
            (
                SeriesKind::Speed,
                Some(ctx.display(UnitKind::Speed, point.velocity)),
            ),
            (SeriesKind::Pace, Some(ctx.display(UnitKind::Pace, pace))),
            (SeriesKind::HeartRate, point.heart_rate.map(f64::from)),
            (
                SeriesKind::HeartRatePercent,
                heart_rate_percent(point.heart_rate, max_hr),
            ),
            (SeriesKind::Cadence, point.cadence.map(f64::from)),
        ];

        for (kind, y) in readings {
            if let Some(series) = distance_series.get_mut(&kind) {
                series.add_reading(x_distance, y);
            }
            if let Some(series) = time_series.get_mut(&kind) {
                series.add_reading(x_time, y);
            }
        }
    }

    drop_empty(&mut distance_series, Axis::Distance);
    drop_empty(&mut time_series, Axis::Time);

    if distance_series.contains_key(&SeriesKind::HeartRate) && !zones.is_empty() {
        let (mut by_distance, mut by_time) = ctx.series_pair(
            "Heart Rate zone",
            ctx.y_label("Heart Rate", &ctx.catalog.translate("bpm")),
            None,
            GraphType::HorizontalSpan,
        );
        for zone in zones {
            by_distance.add_band(zone.lower, zone.upper, &zone.label, &zone.color);
            by_time.add_band(zone.lower, zone.upper, &zone.label, &zone.color);
        }
        distance_series.insert(SeriesKind::HeartRateZone, by_distance);
        time_series.insert(SeriesKind::HeartRateZone, by_time);
    }

    (distance_series, time_series)
}
