//! Publishing activities to external services.

pub mod strava;
