use std::path::PathBuf;
use std::time::Duration;

use crate::types::units::MeasurementSystem;

const DEFAULT_STRAVA_LOGIN_URL: &str = "https://www.strava.com/api/v2/authentication/login";
const DEFAULT_STRAVA_UPLOAD_URL: &str = "http://www.strava.com/api/v2/upload";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cache_ttl: Duration,
    pub database_path: PathBuf,
    /// Per-user directory: track logs live in `gpx/`, the Strava token at `.strava_token`.
    pub conf_dir: PathBuf,
    pub measurement_system: MeasurementSystem,
    pub max_hr: Option<u16>,
    pub rest_hr: Option<u16>,
    pub age: Option<u16>,
    pub karvonen: bool,
    pub catalog_path: Option<PathBuf>,
    pub strava: StravaConfig,
}

#[derive(Debug, Clone)]
pub struct StravaConfig {
    pub email: String,
    pub password: String,
    pub login_url: String,
    pub upload_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let cache_ttl_seconds = std::env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        let database_path = std::env::var("TRAINLOG_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("trainlog.db"));

        let conf_dir = std::env::var("TRAINLOG_CONF_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let measurement_system = std::env::var("TRAINLOG_UNITS")
            .ok()
            .and_then(|s| MeasurementSystem::from_str(&s))
            .unwrap_or_default();

        let karvonen = std::env::var("TRAINLOG_KARVONEN")
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            port,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
            database_path,
            conf_dir,
            measurement_system,
            max_hr: parse_env("TRAINLOG_MAX_HR"),
            rest_hr: parse_env("TRAINLOG_REST_HR"),
            age: parse_env("TRAINLOG_AGE"),
            karvonen,
            catalog_path: std::env::var("TRAINLOG_CATALOG").ok().map(PathBuf::from),
            strava: StravaConfig {
                email: std::env::var("STRAVA_EMAIL").unwrap_or_default(),
                password: std::env::var("STRAVA_PASSWORD").unwrap_or_default(),
                login_url: std::env::var("STRAVA_LOGIN_URL")
                    .unwrap_or_else(|_| DEFAULT_STRAVA_LOGIN_URL.to_string()),
                upload_url: std::env::var("STRAVA_UPLOAD_URL")
                    .unwrap_or_else(|_| DEFAULT_STRAVA_UPLOAD_URL.to_string()),
            },
        }
    }

    pub fn gpx_dir(&self) -> PathBuf {
        self.conf_dir.join("gpx")
    }

    pub fn strava_token_path(&self) -> PathBuf {
        self.conf_dir.join(".strava_token")
    }
}

impl Default for StravaConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            login_url: DEFAULT_STRAVA_LOGIN_URL.to_string(),
            upload_url: DEFAULT_STRAVA_UPLOAD_URL.to_string(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
