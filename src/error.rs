use std::time::Duration;

use thiserror::Error;

/// Message shown when a load failure carries no readable detail.
pub const GENERIC_LOAD_FAILURE: &str = "Unable to load feature flags.";

/// ConfigError is returned when client configuration input cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {name}")]
    InvalidOverride { name: &'static str, value: String },
}

/// SourceError describes why the flag service could not deliver flag assignments.
#[derive(Clone, Debug, Error)]
pub enum SourceError {
    #[error("timed out after {}ms waiting for feature flags", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),

    #[error("flag service responded with HTTP status {0}")]
    Status(u16),

    #[error("malformed feature payload: {0}")]
    Decode(String),

    #[error("unsupported feature payload: {0}")]
    Unsupported(String),

    #[error("feature flag load was cancelled before it completed")]
    Cancelled,
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SourceError::Status(status.as_u16()),
            None => SourceError::Transport(e.to_string()),
        }
    }
}

/// Converts a load failure into the message stored on the client.
pub fn describe_failure(error: &SourceError) -> String {
    let detail = error.to_string();
    if detail.trim().is_empty() {
        GENERIC_LOAD_FAILURE.to_string()
    } else {
        detail
    }
}
