//! Instagram media source
//!
//! Lists the authenticated account's media through the Graph API
//! `me/media` edge. One bounded page is requested per fetch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::{FeedConfig, InstagramConfig, INSTAGRAM_ACCESS_TOKEN};
use crate::error::{PlatformError, Result};
use crate::platforms::{http_client, normalize_base_url, FeedSource};
use crate::types::{FeedPost, Platform};

pub const DEFAULT_BASE_URL: &str = "https://graph.instagram.com";
const MEDIA_PATH: &str = "/me/media";
const MEDIA_FIELDS: &str = "id,caption,media_url,timestamp";

/// Body of a `me/media` response
#[derive(Debug, Default, Deserialize)]
pub struct MediaPage {
    #[serde(default)]
    pub data: Vec<RawMedia>,
}

/// A media item as returned by the Graph API
#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    pub timestamp: String,
}

impl RawMedia {
    /// Normalize into a feed post; a missing caption becomes empty text
    pub fn into_post(self) -> Result<FeedPost> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        Ok(FeedPost::media(
            self.id,
            self.caption.unwrap_or_default(),
            self.media_url,
            timestamp,
        ))
    }
}

/// Parse a Graph API timestamp into UTC
///
/// Accepts RFC 3339 (`2024-01-01T12:00:00Z`, `...+00:00`) as well as the
/// colon-less offset the Graph API actually emits (`...+0000`).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            PlatformError::Parse(format!(
                "Instagram timestamp '{}' is not ISO 8601: {}",
                value, e
            ))
            .into()
        })
}

pub struct InstagramClient {
    http: reqwest::Client,
    access_token: SecretString,
    base_url: String,
}

impl InstagramClient {
    pub fn new(access_token: SecretString, base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            access_token,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` if no access token is configured.
    pub fn from_config(config: InstagramConfig, feed: &FeedConfig) -> Result<Self> {
        let access_token = config.access_token.ok_or_else(|| {
            PlatformError::Authentication(format!(
                "Instagram credential {} is not set. Add it to your environment or config file.",
                INSTAGRAM_ACCESS_TOKEN
            ))
        })?;
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        Self::new(access_token, base_url, feed.timeout_secs)
    }

    /// Fetch one page of raw media items
    pub async fn list_media(&self, limit: usize) -> Result<Vec<RawMedia>> {
        let url = format!("{}{}", self.base_url, MEDIA_PATH);

        tracing::debug!(limit, "Requesting Instagram media");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", MEDIA_FIELDS.to_string()),
                ("access_token", self.access_token.expose_secret().to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            // reqwest errors can echo the URL, which carries the token
            .map_err(|e| PlatformError::from_reqwest("Instagram", "list media", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                PlatformError::from_status("Instagram", "list media", status.as_u16(), &body).into(),
            );
        }

        let page: MediaPage = response
            .json()
            .await
            .map_err(|e| PlatformError::from_reqwest("Instagram", "list media", e.without_url()))?;

        Ok(page.data)
    }
}

#[async_trait]
impl FeedSource for InstagramClient {
    fn platform(&self) -> Platform {
        Platform::Media
    }

    fn name(&self) -> &str {
        "instagram"
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<FeedPost>> {
        self.list_media(limit)
            .await?
            .into_iter()
            .map(RawMedia::into_post)
            .collect()
    }
}
