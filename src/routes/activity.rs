use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::fields::Field;
use crate::activity::ActivityRecord;
use crate::error::AppError;
use crate::state::AppState;
use crate::types::series::{Axis, Series, SeriesKind, SeriesMap};
use crate::types::units::UnitLabels;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/activities/:id",
            get(get_activity).patch(update_activity),
        )
        .route("/api/activities/:id/series", get(get_series))
}

#[derive(Debug, Serialize)]
pub struct ActivitySummary {
    id: i64,
    title: String,
    sport: String,
    date: String,
    date_time: Option<String>,
    start_time: Option<String>,
    has_track_log: bool,
    pause_seconds: f64,
    units: UnitLabels,
    fields: BTreeMap<&'static str, String>,
    laps: usize,
    series: AvailableSeries,
}

#[derive(Debug, Serialize)]
struct AvailableSeries {
    distance: Vec<SeriesKind>,
    time: Vec<SeriesKind>,
}

impl From<&ActivityRecord> for ActivitySummary {
    fn from(activity: &ActivityRecord) -> Self {
        let scalars = activity.scalars();
        let fields = Field::ALL
            .into_iter()
            .map(|field| {
                let precision = match field {
                    Field::Calories => None,
                    _ => Some(2),
                };
                (
                    field.as_str(),
                    activity.get_value_formatted(field.as_str(), precision, true),
                )
            })
            .collect();

        Self {
            id: activity.id(),
            title: scalars.title.clone(),
            sport: scalars.sport_name.clone(),
            date: scalars.date.clone(),
            date_time: activity.date_time().map(|dt| dt.to_rfc3339()),
            start_time: activity.start_time().map(str::to_string),
            has_track_log: activity.has_track_log(),
            pause_seconds: activity.pause_time(),
            units: activity.units().clone(),
            fields,
            laps: activity.laps().len(),
            series: AvailableSeries {
                distance: activity.distance_series().keys().copied().collect(),
                time: activity.time_series().keys().copied().collect(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeriesQuery {
    axis: Option<String>,
}

#[derive(Debug, Serialize)]
struct SeriesResponse {
    axis: Axis,
    series: SeriesMap,
    lap_markers: Option<Series>,
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    field: String,
    value: Value,
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ActivitySummary>, AppError> {
    let activity = load(state, id).await?;
    Ok(Json(ActivitySummary::from(&activity)))
}

async fn get_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<SeriesResponse>, AppError> {
    let axis = match query.axis.as_deref() {
        None => Axis::Distance,
        Some(value) => Axis::from_str(value)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown axis: {}", value)))?,
    };

    let activity = load(state, id).await?;
    Ok(Json(SeriesResponse {
        axis,
        series: activity.series(axis).clone(),
        lap_markers: activity.lap_markers(axis).cloned(),
    }))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<ActivitySummary>, AppError> {
    let field = Field::from_str(&payload.field)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown field: {}", payload.field)))?;
    if field.access().set.is_none() {
        return Err(AppError::BadRequest(format!(
            "Field {} is read-only",
            field.as_str()
        )));
    }
    let value = match payload.value {
        Value::String(value) => value,
        other => other.to_string(),
    };

    let (activity, changed) = tokio::task::spawn_blocking(move || {
        state.update(id, field.as_str(), &value)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Update task failed: {}", e)))??;
    if !changed {
        return Err(AppError::BadRequest(format!(
            "Unable to set {} from the given value",
            field.as_str()
        )));
    }

    tracing::info!("Updated {} for activity {}", field.as_str(), id);
    Ok(Json(ActivitySummary::from(&activity)))
}

/// Activity loads query SQLite and read the track log, so they run off the
/// async workers.
async fn load(state: AppState, id: i64) -> Result<ActivityRecord, AppError> {
    tokio::task::spawn_blocking(move || state.activity(id))
        .await
        .map_err(|e| AppError::Internal(format!("Load task failed: {}", e)))?
}
