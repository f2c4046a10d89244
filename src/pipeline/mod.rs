pub mod laps;
pub mod parse;
pub mod process;
pub mod series;

use std::path::PathBuf;

use crate::error::ParseError;
use crate::types::activity::{FileFormat, TrackLog};

/// Where an activity's track log comes from, if it has one.
pub trait TrackLogSource {
    fn open(&self, id: i64) -> Result<Option<TrackLog>, ParseError>;
}

/// Track logs stored as `<dir>/<id>.gpx`.
#[derive(Debug, Clone)]
pub struct TrackLogDir {
    dir: PathBuf,
}

impl TrackLogDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: i64) -> PathBuf {
        self.dir.join(format!("{}.{}", id, FileFormat::Gpx.extension()))
    }
}

impl TrackLogSource for TrackLogDir {
    fn open(&self, id: i64) -> Result<Option<TrackLog>, ParseError> {
        let path = self.path_for(id);
        if !path.is_file() {
            tracing::debug!("No GPX file found for record id: {}", id);
            return Ok(None);
        }

        let bytes = std::fs::read(&path)?;
        let parsed = parse::parse(&bytes, FileFormat::Gpx)?;
        tracing::debug!(
            "Parsed {} ({} points, {} laps)",
            path.display(),
            parsed.points.len(),
            parsed.laps.len()
        );
        Ok(Some(process::process(&parsed)))
    }
}
