//! Core types for Plurfeed

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The platform a post was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Short-form timeline posts (X/Twitter)
    Microblog,
    /// Photo and video posts (Instagram)
    Media,
}

impl Platform {
    /// Machine-readable tag for this platform
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microblog => "microblog",
            Self::Media => "media",
        }
    }

    /// Label shown to readers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Microblog => "X",
            Self::Media => "Instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Platform-specific part of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum PostKind {
    Microblog { author: String },
    Media { media_url: Option<String> },
}

/// A post normalized from any platform.
///
/// Fields are read-only once built; the aggregator only moves posts around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPost {
    id: String,
    text: String,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    kind: PostKind,
}

impl FeedPost {
    pub fn microblog(
        id: impl Into<String>,
        text: impl Into<String>,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            timestamp,
            kind: PostKind::Microblog {
                author: author.into(),
            },
        }
    }

    pub fn media(
        id: impl Into<String>,
        text: impl Into<String>,
        media_url: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            timestamp,
            kind: PostKind::Media { media_url },
        }
    }

    pub fn platform(&self) -> Platform {
        match self.kind {
            PostKind::Microblog { .. } => Platform::Microblog,
            PostKind::Media { .. } => Platform::Media,
        }
    }

    /// Source-native identifier, unique within its platform
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> &PostKind {
        &self.kind
    }

    /// Author handle; only microblog posts carry one
    pub fn author(&self) -> Option<&str> {
        match &self.kind {
            PostKind::Microblog { author } => Some(author),
            PostKind::Media { .. } => None,
        }
    }

    /// Media location; only media posts carry one
    pub fn media_url(&self) -> Option<&str> {
        match &self.kind {
            PostKind::Media { media_url } => media_url.as_deref(),
            PostKind::Microblog { .. } => None,
        }
    }
}
