//! Mock feed source for testing
//!
//! Returns canned posts (or a canned error) without touching the network, and
//! records how it was called so tests can check ordering and limits.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{PlatformError, Result};
use crate::platforms::FeedSource;
use crate::types::{FeedPost, Platform};

/// Shared call log, so several mocks can record into one sequence
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Limits a source was asked for, in call order
pub type LimitLog = Arc<Mutex<Vec<usize>>>;

pub struct MockSource {
    name: String,
    platform: Platform,
    posts: Vec<FeedPost>,
    error: Option<PlatformError>,
    calls: CallLog,
    limits: LimitLog,
}

impl MockSource {
    /// A source that returns `posts`, truncated to the requested limit
    pub fn with_posts(name: &str, platform: Platform, posts: Vec<FeedPost>) -> Self {
        Self {
            name: name.to_string(),
            platform,
            posts,
            error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            limits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source whose every fetch fails with `error`
    pub fn failing(name: &str, platform: Platform, error: PlatformError) -> Self {
        Self {
            error: Some(error),
            ..Self::with_posts(name, platform, Vec::new())
        }
    }

    /// Record calls into a log shared with other sources
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.calls = log;
        self
    }

    /// Handle to the recorded limits that stays valid after the source is boxed
    pub fn limit_log(&self) -> LimitLog {
        Arc::clone(&self.limits)
    }

    /// Limits passed to each `fetch`, in call order
    pub fn requested_limits(&self) -> Vec<usize> {
        self.limits.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FeedSource for MockSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<FeedPost>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(self.name.clone());
        }
        if let Ok(mut limits) = self.limits.lock() {
            limits.push(limit);
        }

        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(self.posts.iter().take(limit).cloned().collect()),
        }
    }
}
