//! WakaTime API client.
//!
//! Only the durations endpoint is used: one call per calendar day, returning
//! every contiguous stretch of coding activity with its project.

use std::fmt;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, Utc};
use cs_core::{DurationSummary, TimeEntryRecord, TimeSource};
use serde::Deserialize;
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://wakatime.com/api/v1";

/// WakaTime client errors.
#[derive(Debug, Error)]
pub enum WakaTimeError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// WakaTime API client.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the public WakaTime API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WakaTimeError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client against another API root, e.g. a self-hosted
    /// WakaTime-compatible server.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, WakaTimeError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(WakaTimeError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(WakaTimeError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(WakaTimeError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the durations recorded for the current user on `date`.
    pub async fn fetch_durations(&self, date: NaiveDate) -> Result<DurationSummary, WakaTimeError> {
        let url = format!("{}/users/current/durations", self.base_url);
        let date = date.format("%Y-%m-%d").to_string();
        tracing::debug!(%url, %date, "requesting durations");

        let response = self
            .http
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode(&self.api_key)),
            )
            .query(&[("date", date.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(WakaTimeError::Api {
                status,
                message: parse_api_error(&body).unwrap_or(body),
            });
        }

        parse_durations(&body)
    }
}

impl TimeSource for Client {
    type Error = WakaTimeError;

    async fn durations(&self, day: NaiveDate) -> Result<DurationSummary, WakaTimeError> {
        self.fetch_durations(day).await
    }
}

#[derive(Debug, Deserialize)]
struct DurationsResponse {
    data: Vec<DurationItem>,
}

#[derive(Debug, Deserialize)]
struct DurationItem {
    #[serde(default)]
    project: Option<String>,
    /// Start as fractional UNIX seconds.
    time: f64,
    /// Length in fractional seconds.
    duration: f64,
}

fn parse_durations(body: &str) -> Result<DurationSummary, WakaTimeError> {
    let payload: DurationsResponse = serde_json::from_str(body)
        .map_err(|err| WakaTimeError::InvalidResponse(err.to_string()))?;
    let entries = payload
        .data
        .into_iter()
        .map(to_record)
        .collect::<Result<_, _>>()?;
    Ok(DurationSummary { entries })
}

/// Both the start and the duration are truncated to whole seconds.
#[expect(
    clippy::cast_possible_truncation,
    reason = "timestamps and durations are checked to be finite and are truncated on purpose"
)]
fn to_record(item: DurationItem) -> Result<TimeEntryRecord, WakaTimeError> {
    if !item.time.is_finite() || !item.duration.is_finite() || item.duration < 0.0 {
        return Err(WakaTimeError::InvalidResponse(format!(
            "bad duration: time={} duration={}",
            item.time, item.duration
        )));
    }
    let start: DateTime<Utc> = DateTime::from_timestamp(item.time.trunc() as i64, 0)
        .ok_or_else(|| WakaTimeError::InvalidResponse(format!("time out of range: {}", item.time)))?;
    Ok(TimeEntryRecord::new(
        item.project.unwrap_or_default(),
        start,
        item.duration.trunc() as i64,
    ))
}

fn parse_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.error)
}
