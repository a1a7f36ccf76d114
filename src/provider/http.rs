//! Shared HTTP client and status mapping for chat-completions endpoints.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::error::ChatError;

/// Transport timeout applied when no explicit one is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| build_client(DEFAULT_TIMEOUT).expect("Failed to build HTTP client"))
}

/// Build a client with a specific transport timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ChatError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| ChatError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Serialize a request body; encoding failures surface as [`ChatError::Unknown`].
pub fn encode_body<T: Serialize>(body: &T) -> Result<Vec<u8>, ChatError> {
    serde_json::to_vec(body).map_err(ChatError::unknown)
}

/// Add extra headers, skipping any name or value that is not valid HTTP.
pub fn extend_headers(headers: &mut HeaderMap, extra: &[(String, String)]) {
    for (name, value) in extra {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            continue;
        };
        headers.insert(name, value);
    }
}

/// Map a non-2xx status to the provider failure taxonomy.
pub fn status_to_error(status: u16, body: &str) -> ChatError {
    let detail = extract_error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 => ChatError::InvalidCredential(detail),
        429 => ChatError::QuotaExceeded(detail),
        _ => ChatError::ServiceUnavailable(format!("HTTP {status}: {detail}")),
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
}
