//! Profile persistence and "current profile" tracking.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::AgentProfile;
use crate::error::ChatError;
use crate::util::fs::{atomic_write, read_optional};

/// The two reads the orchestrator needs from profile storage.
pub trait ProfileRepository: Send + Sync {
    /// The current profile, if one is set and still exists.
    fn get_current(&self) -> Option<AgentProfile>;

    /// Create the default profile, store it and make it current.
    fn create_default(&self) -> AgentProfile;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBook {
    #[serde(default)]
    current_profile_id: Option<Uuid>,
    #[serde(default)]
    profiles: Vec<AgentProfile>,
}

impl ProfileBook {
    fn upsert(&mut self, profile: AgentProfile) {
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    fn get(&self, id: Uuid) -> Option<&AgentProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    fn current(&self) -> Option<AgentProfile> {
        self.current_profile_id
            .and_then(|id| self.get(id))
            .cloned()
    }

    fn remove(&mut self, id: Uuid) {
        self.profiles.retain(|p| p.id != id);
        if self.current_profile_id == Some(id) {
            self.current_profile_id = None;
        }
    }
}

/// Profiles kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    book: RwLock<ProfileBook>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository holding `profile` as the current one.
    pub fn with_current(profile: AgentProfile) -> Self {
        let repo = Self::new();
        repo.save(profile.clone());
        repo.set_current(profile.id);
        repo
    }

    pub fn save(&self, profile: AgentProfile) {
        self.book
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .upsert(profile);
    }

    pub fn get(&self, id: Uuid) -> Option<AgentProfile> {
        self.book
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn list(&self) -> Vec<AgentProfile> {
        self.book
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .profiles
            .clone()
    }

    pub fn delete(&self, id: Uuid) {
        self.book
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    pub fn set_current(&self, id: Uuid) {
        self.book
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .current_profile_id = Some(id);
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn get_current(&self) -> Option<AgentProfile> {
        self.book.read().unwrap_or_else(PoisonError::into_inner).current()
    }

    fn create_default(&self) -> AgentProfile {
        let profile = AgentProfile::default_assistant();
        self.save(profile.clone());
        self.set_current(profile.id);
        profile
    }
}

/// Profiles stored in one JSON file with the current-profile pointer.
#[derive(Debug, Clone)]
pub struct FileProfileRepository {
    path: PathBuf,
}

impl FileProfileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ProfileBook, ChatError> {
        match read_optional(&self.path)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(ProfileBook::default()),
        }
    }

    fn write(&self, book: &ProfileBook) -> Result<(), ChatError> {
        let data = serde_json::to_vec_pretty(book)?;
        atomic_write(&self.path, &data, false)
    }

    fn modify(&self, f: impl FnOnce(&mut ProfileBook)) -> Result<(), ChatError> {
        let mut book = self.read()?;
        f(&mut book);
        self.write(&book)
    }

    /// Insert or replace a profile by id.
    pub fn save(&self, profile: AgentProfile) -> Result<(), ChatError> {
        self.modify(|book| book.upsert(profile))
    }

    pub fn get(&self, id: Uuid) -> Result<Option<AgentProfile>, ChatError> {
        Ok(self.read()?.get(id).cloned())
    }

    pub fn list(&self) -> Result<Vec<AgentProfile>, ChatError> {
        Ok(self.read()?.profiles)
    }

    /// Delete a profile; clears the current pointer if it pointed there.
    pub fn delete(&self, id: Uuid) -> Result<(), ChatError> {
        self.modify(|book| book.remove(id))
    }

    pub fn set_current(&self, id: Uuid) -> Result<(), ChatError> {
        self.modify(|book| book.current_profile_id = Some(id))
    }
}

impl ProfileRepository for FileProfileRepository {
    fn get_current(&self) -> Option<AgentProfile> {
        match self.read() {
            Ok(book) => book.current(),
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "failed to read profiles");
                None
            }
        }
    }

    fn create_default(&self) -> AgentProfile {
        let profile = AgentProfile::default_assistant();
        let saved = self.modify(|book| {
            book.upsert(profile.clone());
            book.current_profile_id = Some(profile.id);
        });
        if let Err(err) = saved {
            warn!(error = %err, path = %self.path.display(), "failed to persist default profile");
        }
        profile
    }
}
