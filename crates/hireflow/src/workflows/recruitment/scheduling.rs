use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

use super::domain::InterviewSlot;

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("token request failed: {0}")]
    Token(String),
    #[error("token response missing field '{0}'")]
    MissingTokenField(&'static str),
    #[error("meeting request failed: {0}")]
    Meeting(String),
    #[error("meeting response missing field '{0}'")]
    MissingMeetingField(&'static str),
    #[error("scheduler runtime unavailable: {0}")]
    Runtime(String),
}

/// Seam for the video-conferencing provider: creates a meeting for the
/// resolved slot and returns the join link.
pub trait MeetingScheduler: Send + Sync {
    fn create_meeting(
        &self,
        topic: &str,
        start_time: InterviewSlot,
        duration_minutes: u32,
    ) -> Result<String, SchedulingError>;
}

/// Seconds before the provider-reported expiry at which a cached token stops
/// being reused.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Bearer-token cache shared by every application going through one
/// scheduler instance. Refresh runs under the lock so concurrent callers
/// cannot race a duplicate refresh.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Returns the cached token while `now < expiry - 60s`, otherwise runs
    /// `refresh` (which yields the new token and its `expires_in` seconds)
    /// and caches the result.
    pub fn get_or_refresh<F>(
        &self,
        now: DateTime<Utc>,
        refresh: F,
    ) -> Result<String, SchedulingError>
    where
        F: FnOnce() -> Result<(String, i64), SchedulingError>,
    {
        let mut slot = self.slot.lock().expect("token cache mutex poisoned");
        if let Some(cached) = slot.as_ref() {
            if now < cached.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) {
                return Ok(cached.token.clone());
            }
        }

        let (token, expires_in) = refresh()?;
        *slot = Some(CachedToken {
            token: token.clone(),
            expires_at: now + Duration::seconds(expires_in),
        });
        Ok(token)
    }
}

/// Credentials for the server-to-server OAuth app at the meeting provider.
#[derive(Debug, Clone)]
pub struct MeetingCredentials {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Zoom client speaking the `account_credentials` OAuth grant and the
/// meetings API. A dedicated runtime lets the synchronous workflow drive the
/// async HTTP client without exposing async details, mirroring how the rest
/// of the crate treats collaborator calls as blocking.
pub struct ZoomMeetingClient {
    http: reqwest::Client,
    runtime: Runtime,
    token_url: String,
    api_base: String,
    credentials: MeetingCredentials,
    cache: TokenCache,
}

impl ZoomMeetingClient {
    pub const TOKEN_URL: &'static str = "https://zoom.us/oauth/token";
    pub const API_BASE: &'static str = "https://api.zoom.us/v2";

    pub fn new(credentials: MeetingCredentials) -> Result<Self, SchedulingError> {
        Self::with_endpoints(credentials, Self::TOKEN_URL, Self::API_BASE)
    }

    pub fn with_endpoints(
        credentials: MeetingCredentials,
        token_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, SchedulingError> {
        let runtime = Runtime::new().map_err(|err| SchedulingError::Runtime(err.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            runtime,
            token_url: token_url.into(),
            api_base: api_base.into(),
            credentials,
            cache: TokenCache::default(),
        })
    }

    fn bearer_token(&self) -> Result<String, SchedulingError> {
        self.cache
            .get_or_refresh(Utc::now(), || self.fetch_token())
    }

    fn fetch_token(&self) -> Result<(String, i64), SchedulingError> {
        let response: Value = self
            .runtime
            .block_on(async {
                self.http
                    .post(&self.token_url)
                    .basic_auth(
                        &self.credentials.client_id,
                        Some(&self.credentials.client_secret),
                    )
                    .form(&[
                        ("grant_type", "account_credentials"),
                        ("account_id", self.credentials.account_id.as_str()),
                    ])
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await
            })
            .map_err(|err: reqwest::Error| SchedulingError::Token(err.to_string()))?;

        let token = response
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(SchedulingError::MissingTokenField("access_token"))?;
        let expires_in = response
            .get("expires_in")
            .and_then(Value::as_i64)
            .ok_or(SchedulingError::MissingTokenField("expires_in"))?;
        Ok((token.to_string(), expires_in))
    }
}

impl std::fmt::Debug for ZoomMeetingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomMeetingClient").finish_non_exhaustive()
    }
}

impl MeetingScheduler for ZoomMeetingClient {
    fn create_meeting(
        &self,
        topic: &str,
        start_time: InterviewSlot,
        duration_minutes: u32,
    ) -> Result<String, SchedulingError> {
        let token = self.bearer_token()?;
        let payload = json!({
            "topic": topic,
            "type": 2,
            "start_time": start_time.0.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "duration": duration_minutes,
            "timezone": "UTC",
            "settings": {
                "join_before_host": true,
                "waiting_room": false,
            },
        });

        let url = format!("{}/users/me/meetings", self.api_base);
        let response: Value = self
            .runtime
            .block_on(async {
                self.http
                    .post(&url)
                    .bearer_auth(&token)
                    .json(&payload)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await
            })
            .map_err(|err: reqwest::Error| SchedulingError::Meeting(err.to_string()))?;

        response
            .get("join_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(SchedulingError::MissingMeetingField("join_url"))
    }
}
