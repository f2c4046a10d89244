use std::path::Path;

use rusqlite::{params, Connection, Row};

use super::migrations::run_migrations;
use super::{ActivityStore, Cell, LapRow, RecordRow};
use crate::error::StoreError;
use crate::lenient;

pub struct SqliteStore {
    conn: Connection,
}

/// Typed values for seeding a `records` row.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub sport: Option<i64>,
    pub date: Option<String>,
    pub distance: Option<f64>,
    pub time: Option<i64>,
    pub beats: Option<f64>,
    pub average: Option<f64>,
    pub calories: Option<i64>,
    pub comments: Option<String>,
    pub title: Option<String>,
    pub upositive: Option<f64>,
    pub unegative: Option<f64>,
    pub maxspeed: Option<f64>,
    pub maxpace: Option<f64>,
    pub pace: Option<f64>,
    pub maxbeats: Option<f64>,
    pub date_time_local: Option<String>,
    pub date_time_utc: Option<String>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
            tracing::error!("Failed to enable foreign keys: {}", err);
        }
        run_migrations(&conn)?;
        tracing::info!("Database initialized at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn insert_sport(&self, name: &str, max_pace: Option<f64>) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO sports (name, max_pace) VALUES (?1, ?2)",
            params![name, max_pace],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_record(&self, record: &NewRecord) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO records (sport, date, distance, time, duration, beats, average, calories,
                comments, title, upositive, unegative, maxspeed, maxpace, pace, maxbeats,
                date_time_local, date_time_utc)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                record.sport,
                record.date,
                record.distance,
                record.time,
                record.beats,
                record.average,
                record.calories,
                record.comments,
                record.title,
                record.upositive,
                record.unegative,
                record.maxspeed,
                record.maxpace,
                record.pace,
                record.maxbeats,
                record.date_time_local,
                record.date_time_utc,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

fn cell(row: &Row, idx: usize) -> rusqlite::Result<Cell> {
    row.get::<_, rusqlite::types::Value>(idx).map(Cell::from)
}

fn row_to_record(row: &Row) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        sport_name: cell(row, 0)?,
        sport_id: cell(row, 1)?,
        date: cell(row, 2)?,
        distance: cell(row, 3)?,
        time: cell(row, 4)?,
        beats: cell(row, 5)?,
        comments: cell(row, 6)?,
        average: cell(row, 7)?,
        calories: cell(row, 8)?,
        id_record: cell(row, 9)?,
        title: cell(row, 10)?,
        upositive: cell(row, 11)?,
        unegative: cell(row, 12)?,
        maxspeed: cell(row, 13)?,
        maxpace: cell(row, 14)?,
        pace: cell(row, 15)?,
        maxbeats: cell(row, 16)?,
        date_time_utc: cell(row, 17)?,
        date_time_local: cell(row, 18)?,
        max_pace: cell(row, 19)?,
    })
}

fn row_to_lap(row: &Row) -> rusqlite::Result<LapRow> {
    Ok(LapRow {
        id_lap: lenient::optional_int(&cell(row, 0)?),
        record: lenient::int(&cell(row, 1)?),
        elapsed_time: cell(row, 2)?.as_text(),
        distance: lenient::float(&cell(row, 3)?),
        start_lat: lenient::optional_float(&cell(row, 4)?),
        start_lon: lenient::optional_float(&cell(row, 5)?),
        end_lat: lenient::optional_float(&cell(row, 6)?),
        end_lon: lenient::optional_float(&cell(row, 7)?),
        calories: lenient::int(&cell(row, 8)?),
        lap_number: lenient::int(&cell(row, 9)?),
        intensity: cell(row, 10)?.as_text(),
        avg_hr: lenient::optional_int(&cell(row, 11)?),
        max_hr: lenient::optional_int(&cell(row, 12)?),
        max_speed: lenient::optional_float(&cell(row, 13)?),
        laptrigger: cell(row, 14)?.as_text(),
        comments: cell(row, 15)?.as_text(),
    })
}

impl ActivityStore for SqliteStore {
    fn select_records(&self, id: i64) -> Result<Vec<RecordRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT sports.name, id_sports, date, distance, time, beats, comments, average,
                    calories, id_record, title, upositive, unegative, maxspeed, maxpace, pace,
                    maxbeats, date_time_utc, date_time_local, sports.max_pace
             FROM records LEFT OUTER JOIN sports ON records.sport = sports.id_sports
             WHERE id_record = ?1",
        )?;
        let rows = stmt
            .query_map(params![id], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn select_laps(&self, id: i64) -> Result<Vec<LapRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id_lap, record, elapsed_time, distance, start_lat, start_lon, end_lat,
                    end_lon, calories, lap_number, intensity, avg_hr, max_hr, max_speed,
                    laptrigger, comments
             FROM laps
             WHERE record = ?1
             ORDER BY lap_number ASC, id_lap ASC",
        )?;
        let rows = stmt
            .query_map(params![id], row_to_lap)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn insert_lap(&self, lap: &LapRow) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO laps (record, lap_number, elapsed_time, distance, start_lat, start_lon,
                end_lat, end_lon, calories, intensity, avg_hr, max_hr, max_speed, laptrigger,
                comments)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                lap.record,
                lap.lap_number,
                lap.elapsed_time,
                lap.distance,
                lap.start_lat,
                lap.start_lon,
                lap.end_lat,
                lap.end_lon,
                lap.calories,
                lap.intensity,
                lap.avg_hr,
                lap.max_hr,
                lap.max_speed,
                lap.laptrigger,
                lap.comments,
            ],
        )?;
        Ok(())
    }
}
