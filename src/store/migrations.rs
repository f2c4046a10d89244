use rusqlite::Connection;

const SCHEMA_VERSION: i64 = 1;

pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sports (
            id_sports INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100),
            weight FLOAT,
            met FLOAT,
            max_pace INTEGER,
            color CHAR(6)
        );

        CREATE TABLE IF NOT EXISTS records (
            id_record INTEGER PRIMARY KEY AUTOINCREMENT,
            date DATE,
            sport INTEGER,
            distance FLOAT,
            time VARCHAR(200),
            duration INTEGER,
            beats FLOAT,
            average FLOAT,
            calories INTEGER,
            comments TEXT,
            gpslog VARCHAR(200),
            title VARCHAR(200),
            upositive FLOAT,
            unegative FLOAT,
            maxspeed FLOAT,
            maxpace FLOAT,
            pace FLOAT,
            maxbeats FLOAT,
            date_time_local VARCHAR(40),
            date_time_utc VARCHAR(40)
        );

        CREATE TABLE IF NOT EXISTS laps (
            id_lap INTEGER PRIMARY KEY AUTOINCREMENT,
            record INTEGER,
            elapsed_time VARCHAR(20),
            distance FLOAT,
            start_lat FLOAT,
            start_lon FLOAT,
            end_lat FLOAT,
            end_lon FLOAT,
            calories INTEGER,
            lap_number INTEGER,
            intensity VARCHAR(7),
            avg_hr INTEGER,
            max_hr INTEGER,
            max_speed FLOAT,
            laptrigger VARCHAR(9),
            comments TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_laps_record ON laps(record);",
    )?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
