mod migrations;
mod sqlite;

pub use sqlite::{NewRecord, SqliteStore};

use serde::Serialize;

use crate::error::StoreError;

/// A column value as the database handed it over, before any coercion.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    /// Textual rendering of a non-null value.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Integer(value) => Some(value.to_string()),
            Cell::Real(value) => Some(value.to_string()),
            Cell::Text(value) => Some(value.clone()),
        }
    }
}

impl From<rusqlite::types::Value> for Cell {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;
        match value {
            Value::Null => Cell::Null,
            Value::Integer(v) => Cell::Integer(v),
            Value::Real(v) => Cell::Real(v),
            Value::Text(v) => Cell::Text(v),
            Value::Blob(v) => Cell::Text(String::from_utf8_lossy(&v).into_owned()),
        }
    }
}

/// One row of `records` left-joined with its sport.
#[derive(Debug, Clone, Default)]
pub struct RecordRow {
    pub sport_name: Cell,
    pub sport_id: Cell,
    pub date: Cell,
    pub distance: Cell,
    pub time: Cell,
    pub beats: Cell,
    pub comments: Cell,
    pub average: Cell,
    pub calories: Cell,
    pub id_record: Cell,
    pub title: Cell,
    pub upositive: Cell,
    pub unegative: Cell,
    pub maxspeed: Cell,
    pub maxpace: Cell,
    pub pace: Cell,
    pub maxbeats: Cell,
    pub date_time_utc: Cell,
    pub date_time_local: Cell,
    pub max_pace: Cell,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LapRow {
    pub id_lap: Option<i64>,
    pub record: i64,
    pub lap_number: i64,
    /// Seconds, kept as the text the database stores.
    pub elapsed_time: Option<String>,
    /// Meters.
    pub distance: f64,
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,
    pub calories: i64,
    pub intensity: Option<String>,
    pub avg_hr: Option<i64>,
    pub max_hr: Option<i64>,
    pub max_speed: Option<f64>,
    pub laptrigger: Option<String>,
    pub comments: Option<String>,
}

pub trait ActivityStore {
    fn select_records(&self, id: i64) -> Result<Vec<RecordRow>, StoreError>;

    fn select_laps(&self, id: i64) -> Result<Vec<LapRow>, StoreError>;

    fn insert_lap(&self, lap: &LapRow) -> Result<(), StoreError>;
}
