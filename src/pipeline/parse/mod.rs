mod gpx;

use crate::error::ParseError;
use crate::types::activity::{FileFormat, ParsedTrackLog};

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedTrackLog, ParseError>;
}

pub fn parse(bytes: &[u8], format: FileFormat) -> Result<ParsedTrackLog, ParseError> {
    match format {
        FileFormat::Gpx => gpx::GpxParser.parse(bytes),
    }
}
