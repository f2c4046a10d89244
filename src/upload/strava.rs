use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::StravaConfig;
use crate::error::UploadError;

const STATUS_PREFIX: &str = "Strava Upload ";

/// Uploads GPX track logs with the account's login token.
///
/// The token is cached in a file so later uploads skip the login call.
pub struct StravaUploader {
    client: reqwest::Client,
    login_url: String,
    upload_url: String,
    token_path: PathBuf,
    email: String,
    password: String,
}

impl StravaUploader {
    pub fn new(config: &StravaConfig, token_path: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            login_url: config.login_url.clone(),
            upload_url: config.upload_url.clone(),
            token_path,
            email: config.email.clone(),
            password: config.password.clone(),
        }
    }

    /// The cached token, or a fresh one from the login endpoint.
    pub async fn login_token(&self) -> Result<String, UploadError> {
        if let Some(token) = self.cached_token().await {
            tracing::debug!("Using cached Strava token");
            return Ok(token);
        }

        let result = self
            .post_form(
                &self.login_url,
                &[("email", self.email.as_str()), ("password", self.password.as_str())],
            )
            .await?;
        let token = result
            .get("token")
            .and_then(Value::as_str)
            .ok_or(UploadError::MissingKey("token"))?
            .to_string();

        if let Err(e) = tokio::fs::write(&self.token_path, &token).await {
            tracing::warn!(
                "Failed to cache Strava token at {}: {}",
                self.token_path.display(),
                e
            );
        }
        Ok(token)
    }

    /// Upload id reported by the service, 0 when there was nothing to send.
    pub async fn upload(&self, token: &str, gpx_path: &Path) -> Result<u64, UploadError> {
        let gpx = match tokio::fs::read_to_string(gpx_path).await {
            Ok(gpx) if !gpx.trim().is_empty() => gpx,
            Ok(_) => return Ok(0),
            Err(e) => {
                tracing::debug!("No GPX to upload at {}: {}", gpx_path.display(), e);
                return Ok(0);
            }
        };

        let result = self
            .post_form(
                &self.upload_url,
                &[("token", token), ("type", "gpx"), ("data", gpx.as_str())],
            )
            .await?;
        let upload_id = result.get("upload_id").ok_or(UploadError::MissingKey("upload_id"))?;
        Ok(upload_id
            .as_u64()
            .or_else(|| upload_id.as_str().and_then(|s| s.trim().parse().ok()))
            .unwrap_or(0))
    }

    /// Uploads the track log and describes the outcome in one line.
    pub async fn run(&self, id: i64, gpx_path: &Path) -> String {
        let outcome = match self.login_token().await {
            Ok(token) => self.upload(&token, gpx_path).await,
            Err(e) => Err(e),
        };

        let status = match outcome {
            Ok(upload_id) if upload_id > 0 => format!("success (id: {})!", upload_id),
            Ok(_) => "failed to upload!".to_string(),
            Err(e) if is_json_error(&e) => {
                format!("JSON error: {}.  Username and password correct?", e)
            }
            Err(e) => format!("failed! {}", e),
        };
        tracing::info!("Strava upload for activity {}: {}", id, status);
        format!("{}{}", STATUS_PREFIX, status)
    }

    async fn cached_token(&self) -> Option<String> {
        let contents = tokio::fs::read_to_string(&self.token_path).await.ok()?;
        let token = contents.lines().next()?.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    async fn post_form(&self, url: &str, values: &[(&str, &str)]) -> Result<Value, UploadError> {
        let response = self.client.post(url).form(values).send().await?;
        Ok(response.error_for_status()?.json::<Value>().await?)
    }
}

fn is_json_error(err: &UploadError) -> bool {
    match err {
        UploadError::MissingKey(_) => true,
        UploadError::Http(e) => e.is_decode(),
    }
}
