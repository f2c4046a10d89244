//! One activity, reconciled from the database and its optional track log.
//!
//! Scalars are stored metric, exactly as the database holds them; the field
//! accessors in [`fields`] convert at the boundary. Track-log points, laps and
//! the derived series are fixed once the record is loaded.

pub mod fields;
pub mod pace;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::ActivityError;
use crate::lenient;
use crate::pipeline::laps::{lap_series, laps_from_track_log};
use crate::pipeline::series::{point_series, SeriesContext};
use crate::pipeline::TrackLogSource;
use crate::profile::Profile;
use crate::store::{ActivityStore, Cell, LapRow, RecordRow};
use crate::types::activity::{TrackLog, TrackPoint};
use crate::types::series::{Axis, Series, SeriesMap};
use crate::types::units::{MeasurementSystem, UnitLabels};

/// Seconds by which point-based and lap-based durations may disagree before
/// the difference counts as paused time.
pub const ACCEPTABLE_LAPSE: f64 = 4.0;

/// Database scalars, metric.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scalars {
    pub distance: f64,
    pub average: f64,
    pub upositive: f64,
    pub unegative: f64,
    pub maxspeed: f64,
    pub maxpace: f64,
    pub pace: f64,
    pub calories: i64,
    pub beats: i64,
    pub maxbeats: i64,
    /// Duration in seconds.
    pub time: i64,
    pub title: String,
    pub comments: String,
    pub sport_name: String,
    pub sport_id: Option<i64>,
    pub date: String,
    pub date_time_local: Option<String>,
    pub date_time_utc: Option<String>,
}

impl Scalars {
    fn from_row(row: &RecordRow, track_log_distance: Option<f64>) -> Self {
        let mut distance = lenient::float(&row.distance);
        if distance == 0.0 {
            distance = track_log_distance.unwrap_or(0.0);
        }

        Self {
            distance,
            average: lenient::float(&row.average),
            upositive: lenient::float(&row.upositive),
            unegative: lenient::float(&row.unegative),
            maxspeed: lenient::float(&row.maxspeed),
            maxpace: lenient::float(&row.maxpace),
            pace: lenient::float(&row.pace),
            calories: lenient::int(&row.calories),
            beats: lenient::int(&row.beats),
            maxbeats: lenient::int(&row.maxbeats),
            time: lenient::int(&row.time),
            title: lenient::text(&row.title),
            comments: lenient::text(&row.comments),
            sport_name: lenient::text(&row.sport_name),
            sport_id: lenient::optional_int(&row.sport_id),
            date: lenient::text(&row.date),
            date_time_local: row.date_time_local.as_text(),
            date_time_utc: row.date_time_utc.as_text(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityRecord {
    id: i64,
    measurement_system: MeasurementSystem,
    units: UnitLabels,
    has_track_log: bool,
    has_data: bool,
    points: Vec<TrackPoint>,
    laps: Vec<LapRow>,
    scalars: Scalars,
    pace_limit: Option<f64>,
    pause_time: f64,
    track_log_distance: Option<f64>,
    date_time: Option<DateTime<FixedOffset>>,
    start_time: Option<String>,
    distance_series: SeriesMap,
    time_series: SeriesMap,
    lap_distance: Option<Series>,
    lap_time: Option<Series>,
}

impl ActivityRecord {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn measurement_system(&self) -> MeasurementSystem {
        self.measurement_system
    }

    pub fn units(&self) -> &UnitLabels {
        &self.units
    }

    pub fn has_track_log(&self) -> bool {
        self.has_track_log
    }

    pub fn has_data(&self) -> bool {
        self.has_data
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn laps(&self) -> &[LapRow] {
        &self.laps
    }

    pub fn scalars(&self) -> &Scalars {
        &self.scalars
    }

    pub fn pace_limit(&self) -> Option<f64> {
        self.pace_limit
    }

    /// Seconds the track log shows as non-active.
    pub fn pause_time(&self) -> f64 {
        self.pause_time
    }

    pub fn track_log_distance(&self) -> Option<f64> {
        self.track_log_distance
    }

    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.date_time
    }

    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    pub fn distance_series(&self) -> &SeriesMap {
        &self.distance_series
    }

    pub fn time_series(&self) -> &SeriesMap {
        &self.time_series
    }

    pub fn series(&self, axis: Axis) -> &SeriesMap {
        match axis {
            Axis::Distance => &self.distance_series,
            Axis::Time => &self.time_series,
        }
    }

    pub fn lap_markers(&self, axis: Axis) -> Option<&Series> {
        match axis {
            Axis::Distance => self.lap_distance.as_ref(),
            Axis::Time => self.lap_time.as_ref(),
        }
    }
}

/// Loads activities from a store and a track-log source.
pub struct ActivityLoader<'a> {
    store: &'a dyn ActivityStore,
    track_logs: &'a dyn TrackLogSource,
    profile: &'a Profile,
    catalog: &'a dyn Catalog,
}

impl<'a> ActivityLoader<'a> {
    pub fn new(
        store: &'a dyn ActivityStore,
        track_logs: &'a dyn TrackLogSource,
        profile: &'a Profile,
        catalog: &'a dyn Catalog,
    ) -> Self {
        Self {
            store,
            track_logs,
            profile,
            catalog,
        }
    }

    pub fn load(&self, id: Option<i64>) -> Result<ActivityRecord, ActivityError> {
        let id = id.ok_or(ActivityError::InvalidArgument)?;
        tracing::debug!("Loading activity {}", id);

        let measurement_system = self.profile.measurement_system;
        let units = UnitLabels::new(measurement_system, self.catalog);

        let track_log = self.track_logs.open(id)?;
        let pause_time = track_log
            .as_ref()
            .map(|log| non_active_time(log.total_time_points, log.total_time_laps))
            .unwrap_or(0.0);
        if pause_time > 0.0 {
            tracing::debug!("Identified non active time: {} s", pause_time);
        }
        let track_log_distance = track_log.as_ref().map(|log| log.total_distance);

        let mut rows = self.store.select_records(id)?;
        if rows.len() != 1 {
            return Err(ActivityError::InconsistentData {
                id,
                rows: rows.len(),
            });
        }
        let row = rows.remove(0);

        let pace_limit = pace_limit(&row.max_pace);
        let scalars = Scalars::from_row(&row, track_log_distance);
        let date_time = resolve_date_time(
            scalars.date_time_local.as_deref(),
            scalars.date_time_utc.as_deref(),
        );
        let start_time = date_time.map(|dt| dt.format("%H:%M:%S").to_string());

        let laps = self.resolve_laps(id, track_log.as_ref())?;

        let ctx = SeriesContext {
            system: measurement_system,
            units: &units,
            pace_limit,
            catalog: self.catalog,
        };
        let points = track_log.map(|log| log.points).unwrap_or_default();
        let zones = self.profile.zones(self.catalog);
        let (mut distance_series, mut time_series) =
            point_series(&points, &ctx, self.profile.max_heart_rate(), &zones);
        let markers = lap_series(&laps, &ctx, &mut distance_series, &mut time_series)?;

        tracing::debug!(
            "Loaded activity {} ({} points, {} laps, {} distance series)",
            id,
            points.len(),
            laps.len(),
            distance_series.len()
        );

        Ok(ActivityRecord {
            id,
            measurement_system,
            units,
            has_track_log: track_log_distance.is_some(),
            has_data: true,
            points,
            laps,
            scalars,
            pace_limit,
            pause_time,
            track_log_distance,
            date_time,
            start_time,
            distance_series,
            time_series,
            lap_distance: markers.by_distance,
            lap_time: markers.by_time,
        })
    }

    /// Database laps, or the track log's laps written back when the database
    /// has none.
    fn resolve_laps(
        &self,
        id: i64,
        track_log: Option<&TrackLog>,
    ) -> Result<Vec<LapRow>, ActivityError> {
        let laps = self.store.select_laps(id)?;
        if !laps.is_empty() {
            return Ok(laps);
        }
        tracing::debug!("No laps in DB for record {}", id);

        let Some(track_log) = track_log else {
            return Ok(laps);
        };
        let derived = laps_from_track_log(id, &track_log.laps);
        for lap in &derived {
            if let Err(err) = self.store.insert_lap(lap) {
                tracing::warn!(
                    "Failed to store lap {} for record {}: {}",
                    lap.lap_number,
                    id,
                    err
                );
            }
        }
        Ok(derived)
    }
}

/// Paused seconds: how far point-based duration exceeds lap-based duration,
/// once that exceeds [`ACCEPTABLE_LAPSE`].
pub fn non_active_time(total_time_points: f64, total_time_laps: f64) -> f64 {
    let diff = total_time_points - total_time_laps;
    if diff > ACCEPTABLE_LAPSE {
        diff
    } else {
        0.0
    }
}

/// A sport's pace ceiling; zero or blank means no limit.
fn pace_limit(cell: &Cell) -> Option<f64> {
    lenient::optional_float(cell).filter(|limit| *limit != 0.0)
}

/// Prefers the stored local timestamp, else shifts the UTC one to the host's
/// offset.
pub fn resolve_date_time(local: Option<&str>, utc: Option<&str>) -> Option<DateTime<FixedOffset>> {
    if let Some(local) = local {
        match parse_timestamp(local, |naive| {
            Local.from_local_datetime(&naive).earliest().map(|dt| dt.fixed_offset())
        }) {
            Some(dt) => return Some(dt),
            None => tracing::warn!("Unreadable local timestamp {:?}", local),
        }
    }

    let utc = utc?;
    let parsed = parse_timestamp(utc, |naive| Some(Utc.from_utc_datetime(&naive).fixed_offset()));
    if parsed.is_none() {
        tracing::warn!("Unreadable UTC timestamp {:?}", utc);
    }
    parsed.map(|dt| dt.with_timezone(&Local).fixed_offset())
}

/// RFC 3339 first; timestamps without an offset go through `naive`.
fn parse_timestamp(
    value: &str,
    naive: impl Fn(NaiveDateTime) -> Option<DateTime<FixedOffset>>,
) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(naive)
}
