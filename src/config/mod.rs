//! Configuration system (layered: code > env > settings file > credential file).

pub mod credentials;
pub mod settings;

pub use credentials::{CredentialResolver, FileCredentialStore};
pub use settings::Settings;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::warn;

/// Layered configuration for Parley.
///
/// Resolution order for API keys:
/// 1. Explicit keys (from env vars or `set_api_key`)
/// 2. Secrets saved in the [`FileCredentialStore`]
#[derive(Clone)]
pub struct ChatConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    credential_store: Option<Arc<FileCredentialStore>>,
    settings: Settings,
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<String> = self
            .api_keys
            .read()
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("ChatConfig")
            .field("api_keys", &providers)
            .field("base_urls", &self.base_urls)
            .field("credential_store", &self.credential_store.as_ref().map(|s| s.path().to_path_buf()))
            .field("settings", &self.settings)
            .finish()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatConfig {
    /// Create empty config backed by the default credential file.
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(RwLock::new(HashMap::new())),
            base_urls: Arc::new(RwLock::new(HashMap::new())),
            credential_store: Some(Arc::new(FileCredentialStore::new_default())),
            settings: Settings::default(),
        }
    }

    /// Use a specific credential store (or `None` to disable the fallback).
    pub fn with_credential_store(mut self, store: Option<Arc<FileCredentialStore>>) -> Self {
        self.credential_store = store;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Load from environment variables and the settings file.
    ///
    /// The settings file is `PARLEY_SETTINGS` if set, else `settings.toml` in
    /// the data directory. A broken settings file is logged and ignored.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let settings_path = std::env::var_os("PARLEY_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir().join(settings::SETTINGS_FILE_NAME));
        let mut settings = Settings::load(&settings_path).unwrap_or_else(|err| {
            warn!(error = %err, path = %settings_path.display(), "ignoring unreadable settings file");
            Settings::default()
        });

        if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
            settings.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(raw) = std::env::var("PARLEY_TEMPERATURE") {
            match raw.parse::<f64>() {
                Ok(t) if (0.0..=2.0).contains(&t) => settings.temperature = t,
                _ => warn!(value = %raw, "ignoring invalid PARLEY_TEMPERATURE"),
            }
        }

        let store = FileCredentialStore::new(
            settings
                .data_dir
                .clone()
                .unwrap_or_else(default_data_dir)
                .join(credentials::CREDENTIALS_FILE_NAME),
        );
        let config = Self::new()
            .with_settings(settings)
            .with_credential_store(Some(Arc::new(store)));

        let env_mappings = [
            ("OPENAI_API_KEY", "openai"),
            ("OPENROUTER_API_KEY", "openrouter"),
        ];
        for (env_var, provider) in &env_mappings {
            if let Ok(key) = std::env::var(env_var) {
                config.set_api_key(provider, key);
            }
        }

        let url_mappings = [
            ("OPENAI_BASE_URL", "openai"),
            ("OPENROUTER_BASE_URL", "openrouter"),
        ];
        for (env_var, provider) in &url_mappings {
            if let Ok(url) = std::env::var(env_var) {
                config.set_base_url(provider, url);
            }
        }

        config
    }

    pub fn set_api_key(&self, provider: &str, key: String) {
        self.api_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider.to_string(), key);
    }

    /// Resolve an API key: explicit keys first, then the credential store.
    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        let explicit = self
            .api_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(provider)
            .cloned();
        explicit.or_else(|| {
            self.credential_store
                .as_ref()
                .and_then(|store| store.get(provider))
        })
    }

    pub fn set_base_url(&self, provider: &str, url: String) {
        self.base_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider.to_string(), url);
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(provider)
            .cloned()
    }

    /// Check if a provider has credentials configured (explicit key or store).
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }

    pub fn credential_store(&self) -> Option<&FileCredentialStore> {
        self.credential_store.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn temperature(&self) -> f64 {
        self.settings.temperature
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    pub fn search_latency(&self) -> Duration {
        Duration::from_millis(self.settings.search_latency_ms)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.settings.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Directory holding one memory file per agent.
    pub fn memory_dir(&self) -> PathBuf {
        self.data_dir().join("memory")
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.data_dir().join("profiles.json")
    }
}

impl CredentialResolver for ChatConfig {
    fn get(&self, service_id: &str) -> Option<String> {
        self.get_api_key(service_id)
    }
}

/// Platform data directory for Parley (e.g. `~/.local/share/parley`).
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "parley", "parley")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".parley"))
}
