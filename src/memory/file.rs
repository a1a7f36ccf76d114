//! One JSON file per agent: `<dir>/<agent-id>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use super::{push_bounded, MemoryRecord, MemoryStore};
use crate::error::ChatError;
use crate::util::fs::{atomic_write, read_optional, remove_if_exists};

const MEMORY_FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    dir: PathBuf,
}

impl FileMemoryStore {
    /// Store records under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `agent_id`.
    pub fn record_path(&self, agent_id: Uuid) -> PathBuf {
        self.dir
            .join(format!("{}.{MEMORY_FILE_EXTENSION}", agent_id.hyphenated()))
    }

    /// Read the record for `agent_id`, surfacing IO and parse failures.
    pub fn read_record(&self, agent_id: Uuid) -> Result<Option<MemoryRecord>, ChatError> {
        let Some(raw) = read_optional(&self.record_path(agent_id))? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist a record, replacing any previous one for the same agent.
    pub fn write_record(&self, record: &MemoryRecord) -> Result<(), ChatError> {
        let data = serde_json::to_vec_pretty(record)?;
        atomic_write(&self.record_path(record.agent_id), &data, false)
    }

    pub fn remove_record(&self, agent_id: Uuid) -> Result<(), ChatError> {
        remove_if_exists(&self.record_path(agent_id))
    }
}

impl MemoryStore for FileMemoryStore {
    fn load(&self, agent_id: Uuid) -> Vec<String> {
        match self.read_record(agent_id) {
            Ok(Some(record)) => record.messages,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%agent_id, error = %err, "failed to load memory; treating as empty");
                Vec::new()
            }
        }
    }

    fn append(&self, agent_id: Uuid, line: &str) {
        let mut lines = self.load(agent_id);
        push_bounded(&mut lines, line.to_string());
        if let Err(err) = self.write_record(&MemoryRecord::new(agent_id, lines)) {
            warn!(%agent_id, error = %err, "failed to save memory");
        }
    }

    fn clear(&self, agent_id: Uuid) {
        if let Err(err) = self.remove_record(agent_id) {
            warn!(%agent_id, error = %err, "failed to clear memory");
        }
    }

    fn load_all(&self) -> Vec<(Uuid, Vec<String>)> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %self.dir.display(), error = %err, "memory directory not readable");
                return Vec::new();
            }
        };

        let mut records: Vec<(Uuid, Vec<String>)> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == MEMORY_FILE_EXTENSION)
            })
            .filter_map(|path| {
                let parsed = fs::read_to_string(&path)
                    .map_err(ChatError::from)
                    .and_then(|raw| Ok(serde_json::from_str::<MemoryRecord>(&raw)?));
                match parsed {
                    Ok(record) => Some((record.agent_id, record.messages)),
                    Err(err) => {
                        debug!(path = %path.display(), error = %err, "skipping unreadable memory file");
                        None
                    }
                }
            })
            .collect();

        records.sort_by_key(|(id, _)| *id);
        records
    }
}
