//! Error classification and recovery hints.

use strum::Display;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Server,
    Configuration,
    Storage,
    Unknown,
}

/// Suggested recovery action, phrased for the person at the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    CheckCredentials,
    WaitForQuota,
    RetryLater,
    CheckConfiguration,
    ContactSupport,
}

impl RecoverySuggestion {
    pub fn hint(self) -> &'static str {
        match self {
            Self::CheckCredentials => "Check the API key configured for this provider.",
            Self::WaitForQuota => "The provider quota was exceeded; wait before sending again.",
            Self::RetryLater => "The provider could not be reached; try again shortly.",
            Self::CheckConfiguration => "Pick a supported provider and model for this agent.",
            Self::ContactSupport => "An unexpected error occurred.",
        }
    }
}
