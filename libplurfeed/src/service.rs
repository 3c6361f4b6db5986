//! Feed collection service
//!
//! `FeedService` owns the configured sources and runs the fetch-then-merge
//! pipeline. Sources are queried one after another in registration order;
//! the first failure aborts the run, so callers either get the complete
//! merged feed or an error, never a partial one.
//!
//! # Example
//!
//! ```no_run
//! use libplurfeed::{Config, FeedService};
//!
//! # async fn example() -> libplurfeed::Result<()> {
//! let service = FeedService::from_config(Config::from_env())?;
//! let feed = service.collect().await?;
//! println!("{} posts", feed.len());
//! # Ok(())
//! # }
//! ```

use crate::aggregator::aggregate_all;
use crate::config::{Config, DEFAULT_LIMIT};
use crate::error::{PlurfeedError, Result};
use crate::platforms::instagram::InstagramClient;
use crate::platforms::twitter::TwitterClient;
use crate::platforms::FeedSource;
use crate::types::FeedPost;

/// Upper bound accepted for the per-source limit (Twitter's maximum `count`)
pub const MAX_LIMIT: usize = 200;

pub struct FeedService {
    sources: Vec<Box<dyn FeedSource>>,
    limit: usize,
}

impl FeedService {
    /// Create an empty service requesting `limit` posts per source
    ///
    /// # Errors
    ///
    /// Returns `PlurfeedError::InvalidInput` unless `1 <= limit <= 200`.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PlurfeedError::InvalidInput(format!(
                "limit must be between 1 and {} (got {})",
                MAX_LIMIT, limit
            )));
        }

        Ok(Self {
            sources: Vec::new(),
            limit,
        })
    }

    /// Build the Twitter and Instagram sources from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let Config {
            twitter,
            instagram,
            feed,
        } = config;

        let mut service = Self::new(feed.limit)?;
        service.add_source(Box::new(TwitterClient::from_config(twitter, &feed)?));
        service.add_source(Box::new(InstagramClient::from_config(instagram, &feed)?));
        Ok(service)
    }

    /// Register a source; sources are fetched in the order they are added
    pub fn add_source(&mut self, source: Box<dyn FeedSource>) {
        self.sources.push(source);
    }

    pub fn with_source(mut self, source: Box<dyn FeedSource>) -> Self {
        self.add_source(source);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fetch every source in turn and merge the results, newest first
    pub async fn collect(&self) -> Result<Vec<FeedPost>> {
        let mut feeds = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let posts = source.fetch(self.limit).await.map_err(|e| {
                tracing::error!(source = source.name(), error = %e, "Fetch failed");
                e
            })?;
            tracing::info!(
                source = source.name(),
                platform = source.platform().as_str(),
                count = posts.len(),
                "Fetched posts"
            );
            feeds.push(posts);
        }

        let merged = aggregate_all(feeds);
        tracing::debug!(total = merged.len(), "Merged feed");
        Ok(merged)
    }
}

impl Default for FeedService {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedConfig, InstagramConfig, TwitterConfig};
    use crate::error::PlatformError;
    use crate::platforms::mock::{CallLog, MockSource};
    use crate::types::Platform;
    use chrono::{DateTime, TimeZone, Utc};
    use secrecy::SecretString;
    use std::sync::{Arc, Mutex};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::from(value.to_string()))
    }

    #[test]
    fn test_new_rejects_out_of_range_limits() {
        assert!(matches!(FeedService::new(0), Err(PlurfeedError::InvalidInput(_))));
        assert!(matches!(FeedService::new(201), Err(PlurfeedError::InvalidInput(_))));
        assert_eq!(FeedService::new(200).unwrap().limit(), 200);
        assert_eq!(FeedService::default().limit(), 20);
    }

    #[tokio::test]
    async fn test_collect_merges_sources_newest_first() {
        let service = FeedService::new(20)
            .unwrap()
            .with_source(Box::new(MockSource::with_posts(
                "twitter",
                Platform::Microblog,
                vec![
                    FeedPost::microblog("t11", "late", "amy", at(11)),
                    FeedPost::microblog("t9", "early", "amy", at(9)),
                ],
            )))
            .with_source(Box::new(MockSource::with_posts(
                "instagram",
                Platform::Media,
                vec![FeedPost::media("m10", "", None, at(10))],
            )));

        let feed = service.collect().await.unwrap();
        let ids: Vec<&str> = feed.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["t11", "m10", "t9"]);
    }

    #[tokio::test]
    async fn test_collect_passes_limit_to_each_source() {
        let twitter = MockSource::with_posts("twitter", Platform::Microblog, vec![]);
        let instagram = MockSource::with_posts("instagram", Platform::Media, vec![]);
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let twitter = twitter.with_call_log(log.clone());
        let instagram = instagram.with_call_log(log.clone());
        let twitter_limits = twitter.limit_log();
        let instagram_limits = instagram.limit_log();

        let service = FeedService::new(5)
            .unwrap()
            .with_source(Box::new(twitter))
            .with_source(Box::new(instagram));

        assert!(service.collect().await.unwrap().is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["twitter", "instagram"]);
        assert_eq!(*twitter_limits.lock().unwrap(), vec![5]);
        assert_eq!(*instagram_limits.lock().unwrap(), vec![5]);
    }

    #[tokio::test]
    async fn test_first_failure_aborts_without_partial_feed() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let service = FeedService::new(20)
            .unwrap()
            .with_source(Box::new(
                MockSource::failing(
                    "twitter",
                    Platform::Microblog,
                    PlatformError::Authentication("bad token".to_string()),
                )
                .with_call_log(log.clone()),
            ))
            .with_source(Box::new(
                MockSource::with_posts(
                    "instagram",
                    Platform::Media,
                    vec![FeedPost::media("m", "", None, at(1))],
                )
                .with_call_log(log.clone()),
            ));

        let result = service.collect().await;
        match result {
            Err(e) => assert_eq!(e.exit_code(), 2),
            Ok(feed) => panic!("Expected failure, got {} posts", feed.len()),
        }
        assert_eq!(*log.lock().unwrap(), vec!["twitter"]);
    }

    #[tokio::test]
    async fn test_second_source_failure_propagates() {
        let service = FeedService::new(20)
            .unwrap()
            .with_source(Box::new(MockSource::with_posts(
                "twitter",
                Platform::Microblog,
                vec![FeedPost::microblog("t", "x", "amy", at(1))],
            )))
            .with_source(Box::new(MockSource::failing(
                "instagram",
                Platform::Media,
                PlatformError::Parse("bad timestamp".to_string()),
            )));

        assert!(matches!(
            service.collect().await,
            Err(PlurfeedError::Platform(PlatformError::Parse(_)))
        ));
    }

    #[test]
    fn test_from_config_registers_twitter_then_instagram() {
        let config = Config {
            twitter: TwitterConfig {
                consumer_key: secret("ck"),
                consumer_secret: secret("cs"),
                access_token: secret("at"),
                access_token_secret: secret("ats"),
                base_url: None,
            },
            instagram: InstagramConfig {
                access_token: secret("ig"),
                base_url: None,
            },
            feed: FeedConfig {
                limit: 10,
                timeout_secs: 5,
            },
        };

        let service = FeedService::from_config(config).unwrap();
        assert_eq!(service.source_names(), vec!["twitter", "instagram"]);
        assert_eq!(service.limit(), 10);
    }

    #[test]
    fn test_from_config_missing_credentials() {
        let result = FeedService::from_config(Config::default());
        match result {
            Err(e) => {
                assert_eq!(e.exit_code(), 2);
                assert!(e.to_string().contains("TWITTER_CONSUMER_KEY"));
            }
            Ok(_) => panic!("Expected missing credential error"),
        }
    }
}
