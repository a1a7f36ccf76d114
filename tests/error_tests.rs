//! Tests for the error system.

use parley::error::*;

#[test]
fn error_display_names_the_failure() {
    let err = ChatError::QuotaExceeded("You exceeded your current quota".into());
    assert_eq!(err.to_string(), "Quota exceeded: You exceeded your current quota");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: ChatError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: ChatError::Configuration("no provider".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: ChatError::InvalidCredential("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: ChatError::QuotaExceeded("429".to_string()),
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::WaitForQuota,
        },
        Case {
            error: ChatError::ServiceUnavailable("HTTP 503".to_string()),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: ChatError::unknown("something odd"),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: io_error.into(),
            expected_category: ErrorCategory::Storage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: serde_error.into(),
            expected_category: ErrorCategory::Storage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.expected_retryable, "{}", case.error);
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "{}",
            case.error
        );
    }
}

#[test]
fn request_builder_failure_is_service_unavailable() {
    let builder_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();

    let err: ChatError = builder_error.into();

    assert!(matches!(err, ChatError::ServiceUnavailable(_)));
}

#[test]
fn unknown_keeps_its_source() {
    let err = ChatError::unknown(std::io::Error::new(std::io::ErrorKind::Other, "root cause"));
    let source = std::error::Error::source(&err).expect("source");
    assert_eq!(source.to_string(), "root cause");
}

#[test]
fn every_suggestion_has_a_hint() {
    for suggestion in [
        RecoverySuggestion::CheckCredentials,
        RecoverySuggestion::WaitForQuota,
        RecoverySuggestion::RetryLater,
        RecoverySuggestion::CheckConfiguration,
        RecoverySuggestion::ContactSupport,
    ] {
        assert!(!suggestion.hint().is_empty());
    }
}
