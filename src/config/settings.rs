//! Optional `settings.toml` file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::util::fs::read_optional;

pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// User-editable settings. Every field is optional in the file.
///
/// ```toml
/// temperature = 0.4
/// request_timeout_secs = 60
/// search_keywords = ["latest", "price of"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Sampling temperature sent with every completion request.
    pub temperature: f64,
    /// Transport timeout for provider calls.
    pub request_timeout_secs: u64,
    /// Latency of the simulated search backend.
    pub search_latency_ms: u64,
    /// Replaces the built-in search trigger keywords when set.
    pub search_keywords: Option<Vec<String>>,
    /// Where memory records and profiles live.
    pub data_dir: Option<PathBuf>,
    /// Attribution sent to OpenRouter as `HTTP-Referer`.
    pub app_url: Option<String>,
    /// Attribution sent to OpenRouter as `X-Title`.
    pub app_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            request_timeout_secs: 120,
            search_latency_ms: 1000,
            search_keywords: None,
            data_dir: None,
            app_url: None,
            app_name: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChatError> {
        let path = path.as_ref();
        match read_optional(path)? {
            Some(raw) => Self::parse(&raw).map_err(|e| {
                ChatError::Configuration(format!("{}: {e}", path.display()))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Parse settings from TOML text.
    pub fn parse(raw: &str) -> Result<Self, ChatError> {
        let settings: Settings =
            toml::from_str(raw).map_err(|e| ChatError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ChatError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatError::Configuration(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ChatError::Configuration(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::parse("temperature = 0.2\nsearch_keywords = [\"price\"]").unwrap();
        assert_eq!(settings.temperature, 0.2);
        assert_eq!(settings.request_timeout_secs, 120);
        assert_eq!(settings.search_keywords, Some(vec!["price".to_string()]));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let err = Settings::parse("temperature = 3.5").unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("colour = \"blue\"").is_err());
    }
}
