//! Configuration management for Plurfeed
//!
//! Credentials come from an optional TOML file and from environment
//! variables, with the environment taking precedence. The resulting
//! [`Config`] is built once at startup and moved into the feed sources.
//!
//! ```toml
//! [twitter]
//! consumer_key = "..."
//! consumer_secret = "..."
//! access_token = "..."
//! access_token_secret = "..."
//!
//! [instagram]
//! access_token = "..."
//!
//! [feed]
//! limit = 20
//! timeout_secs = 30
//! ```

use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub const TWITTER_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const TWITTER_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const TWITTER_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const INSTAGRAM_ACCESS_TOKEN: &str = "INSTAGRAM_ACCESS_TOKEN";

/// Items requested from each source when nothing else is configured
pub const DEFAULT_LIMIT: usize = 20;

/// Per-request HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default)]
pub struct Config {
    pub twitter: TwitterConfig,
    pub instagram: InstagramConfig,
    pub feed: FeedConfig,
}

/// OAuth 1.0a user-context credentials for the home timeline
#[derive(Debug, Default)]
pub struct TwitterConfig {
    pub consumer_key: Option<SecretString>,
    pub consumer_secret: Option<SecretString>,
    pub access_token: Option<SecretString>,
    pub access_token_secret: Option<SecretString>,
    /// Overrides `https://api.twitter.com`
    pub base_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct InstagramConfig {
    pub access_token: Option<SecretString>,
    /// Overrides `https://graph.instagram.com`
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub limit: usize,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// On-disk shape. Secrets are wrapped as soon as they are read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    twitter: FileTwitter,
    instagram: FileInstagram,
    feed: FileFeed,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileTwitter {
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    access_token: Option<String>,
    access_token_secret: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileInstagram {
    access_token: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileFeed {
    limit: Option<usize>,
    timeout_secs: Option<u64>,
}

impl FileConfig {
    fn into_config(self) -> Config {
        let defaults = FeedConfig::default();
        Config {
            twitter: TwitterConfig {
                consumer_key: secret(self.twitter.consumer_key),
                consumer_secret: secret(self.twitter.consumer_secret),
                access_token: secret(self.twitter.access_token),
                access_token_secret: secret(self.twitter.access_token_secret),
                base_url: self.twitter.base_url,
            },
            instagram: InstagramConfig {
                access_token: secret(self.instagram.access_token),
                base_url: self.instagram.base_url,
            },
            feed: FeedConfig {
                limit: self.feed.limit.unwrap_or(defaults.limit),
                timeout_secs: self.feed.timeout_secs.unwrap_or(defaults.timeout_secs),
            },
        }
    }
}

fn secret(value: Option<String>) -> Option<SecretString> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| SecretString::from(v.trim().to_string()))
}

impl Config {
    /// Load configuration the way `plur-feed` does at startup
    ///
    /// An explicit `path` must exist. Without one, `PLURFEED_CONFIG` or the
    /// XDG default location is read when present. Credential environment
    /// variables are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = resolve_config_path()?;
                if default_path.exists() {
                    Self::load_from_path(&default_path)?
                } else {
                    tracing::debug!("No config file at {}", default_path.display());
                    Self::default()
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string());
        tracing::debug!("Loading config from {}", expanded.display());

        let content = std::fs::read_to_string(&expanded).map_err(ConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Ok(file.into_config())
    }

    /// Build configuration from the credential environment variables alone
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Override credentials with values returned by `lookup`
    ///
    /// Blank values are ignored so an empty variable cannot shadow a file entry.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots = [
            (TWITTER_CONSUMER_KEY, &mut self.twitter.consumer_key),
            (TWITTER_CONSUMER_SECRET, &mut self.twitter.consumer_secret),
            (TWITTER_ACCESS_TOKEN, &mut self.twitter.access_token),
            (TWITTER_ACCESS_TOKEN_SECRET, &mut self.twitter.access_token_secret),
            (INSTAGRAM_ACCESS_TOKEN, &mut self.instagram.access_token),
        ];

        for (name, slot) in slots {
            if let Some(value) = secret(lookup(name)) {
                *slot = Some(value);
            }
        }
    }
}

/// Resolve the configuration file path under the XDG config directory
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("PLURFEED_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("plurfeed").join("config.toml"))
}
