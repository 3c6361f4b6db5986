//! Error types for Plurfeed

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlurfeedError>;

#[derive(Error, Debug)]
pub enum PlurfeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlurfeedError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PlurfeedError::InvalidInput(_) => 3,
            PlurfeedError::Platform(PlatformError::Authentication(_)) => 2,
            PlurfeedError::Platform(_) => 1,
            PlurfeedError::Config(_) => 1,
            PlurfeedError::Output(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failures raised by a feed source while talking to its upstream API.
///
/// Every variant carries a message that already names the platform and the
/// operation, so callers can print it as-is.
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Response(String),

    #[error("Malformed data: {0}")]
    Parse(String),
}

impl PlatformError {
    /// Classify a non-success HTTP status returned by `platform` during `context`.
    pub fn from_status(platform: &str, context: &str, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => PlatformError::Authentication(format!(
                "{} rejected credentials ({}): HTTP {} {}",
                platform, context, status, body
            )),
            _ => PlatformError::Response(format!(
                "{} returned HTTP {} ({}): {}",
                platform, status, context, body
            )),
        }
    }

    /// Map a transport-level reqwest failure.
    ///
    /// Decoding failures are reported as `Parse`; everything else (connect,
    /// timeout, body read) is a `Network` error.
    pub fn from_reqwest(platform: &str, context: &str, error: reqwest::Error) -> Self {
        if error.is_decode() {
            PlatformError::Parse(format!("{} response ({}): {}", platform, context, error))
        } else if error.is_timeout() {
            PlatformError::Network(format!("{} request timed out ({}): {}", platform, context, error))
        } else {
            PlatformError::Network(format!("{} request failed ({}): {}", platform, context, error))
        }
    }
}
