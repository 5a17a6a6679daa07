// src/error.rs

//! Unified error handling for the schedule crawler.

use std::fmt;

use thiserror::Error;

use crate::models::SubjectKind;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching an upstream page failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Page fetched fine but its structure was not recognized
    #[error("Unrecognized page structure: {0}")]
    Structure(String),

    /// Identifier absent from the current snapshot
    #[error("{kind} '{id}' not found")]
    NotFound { kind: SubjectKind, id: String },

    /// Query issued before the cache finished initializing
    #[error("Schedule cache is not initialized")]
    Uninitialized,

    /// Operation abandoned because shutdown was requested
    #[error("Shutdown requested")]
    Shutdown,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regex compilation failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a structural parse error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether a fresh attempt of the same operation could succeed.
    ///
    /// Transient fetch failures and unrecognized page shapes are retried
    /// (the next fetch may render correctly); everything else is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Structure(_))
    }
}

/// Failure of a single document fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// Classify a reqwest error for the given URL.
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds() {
        let timeout = AppError::from(FetchError::Timeout {
            url: "https://example.com".into(),
        });
        assert!(timeout.is_retryable());
        assert!(AppError::structure("no day blocks").is_retryable());

        assert!(!AppError::Uninitialized.is_retryable());
        assert!(!AppError::Shutdown.is_retryable());
        assert!(
            !AppError::NotFound {
                kind: SubjectKind::Group,
                id: "1".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn not_found_message_names_kind() {
        let err = AppError::NotFound {
            kind: SubjectKind::Teacher,
            id: "42".into(),
        };
        assert_eq!(err.to_string(), "teacher '42' not found");
    }
}
