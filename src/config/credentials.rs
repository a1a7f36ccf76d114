//! Credential lookup and the file-backed credential store.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ChatError;
use crate::util::fs::{atomic_write, read_optional};

const CREDENTIAL_FILE_VERSION: u32 = 1;

pub const CREDENTIALS_FILE_NAME: &str = "credentials.toml";

/// Resolves a service name (usually a provider identifier) to its secret.
///
/// Absence is a normal state: the provider is simply unusable until a
/// credential shows up.
pub trait CredentialResolver: Send + Sync {
    fn get(&self, service_id: &str) -> Option<String>;
}

impl CredentialResolver for HashMap<String, String> {
    fn get(&self, service_id: &str) -> Option<String> {
        HashMap::get(self, service_id).cloned()
    }
}

/// API keys persisted in a TOML file readable only by the owner.
///
/// # Example
/// ```no_run
/// use parley::config::FileCredentialStore;
///
/// let store = FileCredentialStore::new_default();
/// store.save("openai", "sk-...")?;
/// assert!(store.has("openai"));
/// # Ok::<(), parley::error::ChatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn new_default() -> Self {
        Self::new(super::default_data_dir().join(CREDENTIALS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, ChatError> {
        let Some(raw) = read_optional(&self.path)? else {
            return Ok(BTreeMap::new());
        };
        let file: CredentialFile = toml::from_str(&raw)
            .map_err(|e| ChatError::Configuration(format!("{}: {e}", self.path.display())))?;
        if file.version != CREDENTIAL_FILE_VERSION {
            return Err(ChatError::Configuration(format!(
                "Unsupported credentials file version {} at {}",
                file.version,
                self.path.display()
            )));
        }
        Ok(file.credentials)
    }

    fn write(&self, credentials: BTreeMap<String, String>) -> Result<(), ChatError> {
        let file = CredentialFile {
            version: CREDENTIAL_FILE_VERSION,
            credentials,
        };
        let serialized =
            toml::to_string(&file).map_err(|e| ChatError::Configuration(e.to_string()))?;
        atomic_write(&self.path, serialized.as_bytes(), true)
    }

    /// Store (or replace) the secret for a service.
    pub fn save(&self, service: &str, secret: &str) -> Result<(), ChatError> {
        let mut credentials = self.read()?;
        credentials.insert(service.to_string(), secret.to_string());
        self.write(credentials)
    }

    pub fn load(&self, service: &str) -> Result<Option<String>, ChatError> {
        Ok(self.read()?.remove(service))
    }

    /// Remove the secret for a service. Removing a missing entry is a no-op.
    pub fn delete(&self, service: &str) -> Result<(), ChatError> {
        let mut credentials = self.read()?;
        if credentials.remove(service).is_some() {
            self.write(credentials)?;
        }
        Ok(())
    }

    /// Names of all services with a stored secret.
    pub fn services(&self) -> Result<Vec<String>, ChatError> {
        Ok(self.read()?.into_keys().collect())
    }

    pub fn has(&self, service: &str) -> bool {
        CredentialResolver::get(self, service).is_some()
    }
}

impl CredentialResolver for FileCredentialStore {
    fn get(&self, service_id: &str) -> Option<String> {
        match self.load(service_id) {
            Ok(secret) => secret,
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "failed to read credential store");
                None
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialFile {
    version: u32,
    #[serde(default)]
    credentials: BTreeMap<String, String>,
}
