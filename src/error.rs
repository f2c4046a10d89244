use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Failed to read track log: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to prepare database: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("An activity id is required")]
    InvalidArgument,
    #[error("Expected exactly one record for activity {id}, found {rows}")]
    InconsistentData { id: i64, rows: usize },
    #[error("Lap {lap} has an unreadable elapsed time: {value:?}")]
    LapElapsedTime { lap: usize, value: Option<String> },
    #[error(transparent)]
    TrackLog(#[from] ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("missing key '{0}' in response")]
    MissingKey(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Activity not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Activity(ActivityError::InvalidArgument) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Activity(ActivityError::InconsistentData { rows: 0, .. })
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Activity(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
