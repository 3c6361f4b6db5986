//! X/Twitter home timeline source
//!
//! Reads the authenticated user's home timeline through the v1.1 REST API
//! with OAuth 1.0a user-context signing. Tweets are requested in extended
//! mode so `full_text` is never truncated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;

use crate::config::{
    FeedConfig, TwitterConfig, TWITTER_ACCESS_TOKEN, TWITTER_ACCESS_TOKEN_SECRET,
    TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET,
};
use crate::error::{PlatformError, Result};
use crate::platforms::oauth::OAuthSigner;
use crate::platforms::{http_client, normalize_base_url, FeedSource};
use crate::types::{FeedPost, Platform};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const HOME_TIMELINE_PATH: &str = "/1.1/statuses/home_timeline.json";

/// `created_at` format used by the v1.1 API, e.g. `Wed Oct 10 20:19:24 +0000 2018`
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A tweet as returned by `statuses/home_timeline` (only the fields we read)
#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
    pub id_str: String,
    pub full_text: String,
    pub user: RawUser,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub screen_name: String,
}

impl RawTweet {
    /// Normalize into a feed post
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Parse` if `created_at` is not in the API's format.
    pub fn into_post(self) -> Result<FeedPost> {
        let timestamp = parse_created_at(&self.created_at)?;
        Ok(FeedPost::microblog(
            self.id_str,
            self.full_text,
            self.user.screen_name,
            timestamp,
        ))
    }
}

pub fn parse_created_at(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            PlatformError::Parse(format!(
                "Twitter created_at '{}' is not a valid timestamp: {}",
                value, e
            ))
            .into()
        })
}

/// Home timeline client
pub struct TwitterClient {
    http: reqwest::Client,
    signer: OAuthSigner,
    base_url: String,
}

impl TwitterClient {
    /// # Errors
    ///
    /// Returns `PlatformError::Network` if the HTTP client cannot be built.
    pub fn new(signer: OAuthSigner, base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            signer,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` naming the first credential
    /// that is missing.
    pub fn from_config(config: TwitterConfig, feed: &FeedConfig) -> Result<Self> {
        let consumer_key = require(config.consumer_key, TWITTER_CONSUMER_KEY)?;
        let consumer_secret = require(config.consumer_secret, TWITTER_CONSUMER_SECRET)?;
        let access_token = require(config.access_token, TWITTER_ACCESS_TOKEN)?;
        let access_token_secret = require(config.access_token_secret, TWITTER_ACCESS_TOKEN_SECRET)?;

        let signer = OAuthSigner::new(consumer_key, consumer_secret, access_token, access_token_secret);
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        Self::new(signer, base_url, feed.timeout_secs)
    }

    /// Fetch raw tweets from the home timeline
    pub async fn home_timeline(&self, count: usize) -> Result<Vec<RawTweet>> {
        let url = format!("{}{}", self.base_url, HOME_TIMELINE_PATH);
        let query = [
            ("count", count.to_string()),
            ("tweet_mode", "extended".to_string()),
        ];
        let authorization = self.signer.authorization_header("GET", &url, &query)?;

        tracing::debug!(count, "Requesting Twitter home timeline");

        let response = self
            .http
            .get(&url)
            .query(&query)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| PlatformError::from_reqwest("Twitter", "home timeline", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                PlatformError::from_status("Twitter", "home timeline", status.as_u16(), &body).into(),
            );
        }

        let tweets: Vec<RawTweet> = response
            .json()
            .await
            .map_err(|e| PlatformError::from_reqwest("Twitter", "home timeline", e))?;

        Ok(tweets)
    }
}

fn require(value: Option<SecretString>, name: &str) -> Result<SecretString> {
    value.ok_or_else(|| {
        PlatformError::Authentication(format!(
            "Twitter credential {} is not set. Add it to your environment or config file.",
            name
        ))
        .into()
    })
}

#[async_trait]
impl FeedSource for TwitterClient {
    fn platform(&self) -> Platform {
        Platform::Microblog
    }

    fn name(&self) -> &str {
        "twitter"
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<FeedPost>> {
        self.home_timeline(limit)
            .await?
            .into_iter()
            .map(RawTweet::into_post)
            .collect()
    }
}
