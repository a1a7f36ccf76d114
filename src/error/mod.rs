//! Error types for Parley.

pub mod category;

pub use category::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all Parley operations.
///
/// Only [`ChatError::Configuration`] and the provider variants ever reach the
/// user-facing error channel. `Io` and `Serialization` come from the local
/// stores, whose failures the orchestrator absorbs.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Unknown error: {0}")]
    Unknown(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatError {
    /// Wrap an arbitrary cause as [`ChatError::Unknown`].
    pub fn unknown(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unknown(cause.into())
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::InvalidCredential(_) => ErrorCategory::Authentication,
            Self::QuotaExceeded(_) => ErrorCategory::RateLimit,
            Self::ServiceUnavailable(_) => ErrorCategory::Server,
            Self::Network(_) => ErrorCategory::Network,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Storage,
            Self::Unknown(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the caller could reasonably try again later.
    ///
    /// The orchestrator never retries on its own; this is advisory.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }

    /// Suggest a recovery action for display.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit => RecoverySuggestion::WaitForQuota,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryLater,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Storage | ErrorCategory::Unknown => RecoverySuggestion::ContactSupport,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ServiceUnavailable(format!("Malformed provider response: {err}"))
        } else if err.is_builder() {
            Self::ServiceUnavailable(format!("Invalid provider endpoint: {err}"))
        } else {
            Self::Network(err)
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ChatError>;
