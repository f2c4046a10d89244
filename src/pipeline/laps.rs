use crate::error::ActivityError;
use crate::pipeline::series::SeriesContext;
use crate::store::LapRow;
use crate::types::activity::TrackLogLap;
use crate::types::series::{drop_empty, Axis, GraphType, Series, SeriesKind, SeriesMap};
use crate::types::units::UnitKind;

/// Height of the lap marker bars. A drawing constant, not a measurement.
const LAP_MARKER_HEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct LapMarkers {
    pub by_distance: Option<Series>,
    pub by_time: Option<Series>,
}

/// Minutes per km for a lap, 0 when the lap has no distance.
pub fn lap_pace(time_seconds: f64, distance_km: f64) -> f64 {
    let pace = time_seconds / (60.0 * distance_km);
    if distance_km == 0.0 || !pace.is_finite() {
        0.0
    } else {
        pace
    }
}

/// km/h for a lap, 0 when the lap has no duration.
pub fn lap_speed(time_seconds: f64, distance_km: f64) -> f64 {
    let speed = distance_km / (time_seconds / 3600.0);
    if time_seconds == 0.0 || !speed.is_finite() {
        0.0
    } else {
        speed
    }
}

/// Elapsed time is stored as text. Unlike point readings it must parse.
pub fn lap_elapsed_seconds(index: usize, lap: &LapRow) -> Result<f64, ActivityError> {
    lap.elapsed_time
        .as_deref()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .ok_or_else(|| ActivityError::LapElapsedTime {
            lap: index,
            value: lap.elapsed_time.clone(),
        })
}

/// Adds pace-by-lap and speed-by-lap bars to both axes and returns the lap
/// marker series.
pub fn lap_series(
    laps: &[LapRow],
    ctx: &SeriesContext,
    distance_series: &mut SeriesMap,
    time_series: &mut SeriesMap,
) -> Result<LapMarkers, ActivityError> {
    let mut marker_distance = Series::marker();
    let mut marker_time = Series::marker();

    let (mut pace_distance, mut pace_time) = ctx.series_pair(
        "Pace by Lap",
        ctx.y_label("Pace", &ctx.units.pace),
        Some("#99CCFF"),
        GraphType::Bar,
    );
    let (mut speed_distance, mut speed_time) = ctx.series_pair(
        "Speed by Lap",
        ctx.y_label("Speed", &ctx.units.speed),
        Some("#336633"),
        GraphType::Bar,
    );

    for (idx, lap) in laps.iter().enumerate() {
        let time = lap_elapsed_seconds(idx, lap)?;
        let dist = lap.distance / 1000.0;
        let pace = ctx.clamp_pace(lap_pace(time, dist));
        let avg_speed = lap_speed(time, dist);
        tracing::debug!(
            "Time: {:.1}, Dist: {:.3}, Pace: {:.2}, Speed: {:.2}",
            time,
            dist,
            pace,
            avg_speed
        );

        let x_distance = ctx.display(UnitKind::Distance, dist);
        let pace = ctx.display(UnitKind::Pace, pace);
        let avg_speed = ctx.display(UnitKind::Speed, avg_speed);

        marker_time.add_point(time, LAP_MARKER_HEIGHT);
        marker_distance.add_point(x_distance, LAP_MARKER_HEIGHT);
        pace_distance.add_point(x_distance, pace);
        pace_time.add_point(time, pace);
        speed_distance.add_point(x_distance, avg_speed);
        speed_time.add_point(time, avg_speed);
    }

    distance_series.insert(SeriesKind::PaceByLap, pace_distance);
    distance_series.insert(SeriesKind::SpeedByLap, speed_distance);
    time_series.insert(SeriesKind::PaceByLap, pace_time);
    time_series.insert(SeriesKind::SpeedByLap, speed_time);
    drop_empty(distance_series, Axis::Distance);
    drop_empty(time_series, Axis::Time);

    Ok(LapMarkers {
        by_distance: (!marker_distance.is_empty()).then_some(marker_distance),
        by_time: (!marker_time.is_empty()).then_some(marker_time),
    })
}

/// Lap rows for an activity whose laps only exist in its track log.
pub fn laps_from_track_log(record: i64, laps: &[TrackLogLap]) -> Vec<LapRow> {
    laps.iter()
        .enumerate()
        .map(|(lap_number, lap)| LapRow {
            id_lap: None,
            record,
            lap_number: lap_number as i64,
            elapsed_time: Some(lap.elapsed_time.to_string()),
            distance: lap.distance_m,
            start_lat: lap.start_lat,
            start_lon: lap.start_lon,
            end_lat: lap.end_lat,
            end_lon: lap.end_lon,
            calories: lap.calories.unwrap_or(0),
            intensity: lap.intensity.clone(),
            avg_hr: lap.avg_hr,
            max_hr: lap.max_hr,
            max_speed: lap.max_speed,
            laptrigger: lap.trigger.clone(),
            comments: None,
        })
        .collect()
}
