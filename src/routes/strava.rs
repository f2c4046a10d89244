use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/activities/:id/strava", post(upload_activity))
}

#[derive(Debug, Serialize)]
struct UploadStatus {
    status: String,
}

/// Every upload outcome, failures included, is reported through `status`.
async fn upload_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<UploadStatus> {
    let gpx_path = state.track_logs().path_for(id);
    let status = state.uploader().run(id, &gpx_path).await;
    Json(UploadStatus { status })
}
