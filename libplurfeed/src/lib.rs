//! Plurfeed - read your social timelines as one feed
//!
//! This library fetches recent posts from a microblog timeline (X/Twitter)
//! and a media account (Instagram), normalizes them into a single post shape,
//! and merges them newest first.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod logging;
pub mod platforms;
pub mod presenter;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use aggregator::{aggregate, aggregate_all};
pub use config::Config;
pub use error::{PlurfeedError, Result};
pub use service::FeedService;
pub use types::{FeedPost, Platform, PostKind};
