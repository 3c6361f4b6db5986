//! Feed sources and their implementations
//!
//! Each source reads one platform's recent posts and normalizes them into
//! [`FeedPost`] values. Sources are constructed from [`crate::config`] with
//! their credentials already bound, so fetching only needs a limit.
//!
//! # Examples
//!
//! ```no_run
//! use libplurfeed::platforms::{FeedSource, instagram::InstagramClient};
//! use libplurfeed::config::Config;
//!
//! # async fn example() -> libplurfeed::Result<()> {
//! let config = Config::from_env();
//! let source = InstagramClient::from_config(config.instagram, &config.feed)?;
//!
//! for post in source.fetch(20).await? {
//!     println!("{} {}", post.timestamp(), post.text());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::types::{FeedPost, Platform};

pub mod instagram;
pub mod oauth;
pub mod twitter;

// Available outside tests so integration tests can drive the pipeline
pub mod mock;

/// A platform that can produce normalized posts
///
/// Implementations issue a single bounded request per call. They do not
/// filter, reorder or retry; upstream failures are returned as errors.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Which platform the posts belong to
    fn platform(&self) -> Platform;

    /// Lowercase identifier used in logs (e.g. "twitter", "instagram")
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent posts, in upstream order
    ///
    /// # Errors
    ///
    /// - `PlatformError::Authentication` when credentials are rejected
    /// - `PlatformError::Network` when the request cannot complete
    /// - `PlatformError::Response` for any other non-success status
    /// - `PlatformError::Parse` when the body or a timestamp is malformed
    async fn fetch(&self, limit: usize) -> Result<Vec<FeedPost>>;
}

/// Build the shared HTTP client used by the network sources
///
/// # Errors
///
/// Returns `PlatformError::Network` if the client (usually its TLS backend)
/// cannot be initialized.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("plurfeed/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)).into())
}

/// Trim a trailing slash so paths can be appended with `format!`
pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
