//! Per-agent conversation memory.
//!
//! A memory record is an ordered list of rendered `"speaker: text"` lines,
//! capped at [`MAX_MEMORY_ENTRIES`]. Stores are availability-first: read and
//! write failures are logged and absorbed, never surfaced to the caller.

pub mod file;
pub mod in_memory;

pub use file::FileMemoryStore;
pub use in_memory::InMemoryMemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most recent lines retained per agent.
pub const MAX_MEMORY_ENTRIES: usize = 50;

/// Persisted memory for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub agent_id: Uuid,
    pub messages: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn new(agent_id: Uuid, messages: Vec<String>) -> Self {
        Self {
            agent_id,
            messages,
            timestamp: Utc::now(),
        }
    }
}

/// Append `line` and evict from the front until at most
/// [`MAX_MEMORY_ENTRIES`] remain.
pub fn push_bounded(lines: &mut Vec<String>, line: String) {
    lines.push(line);
    if lines.len() > MAX_MEMORY_ENTRIES {
        let overflow = lines.len() - MAX_MEMORY_ENTRIES;
        lines.drain(..overflow);
    }
}

/// Append-only, size-bounded transcript persistence keyed by agent id.
///
/// `append` is a load-modify-store and is not serialized against concurrent
/// appends for the same agent; callers run one turn per agent at a time.
pub trait MemoryStore: Send + Sync {
    /// Lines for `agent_id`, oldest first. Empty when absent or unreadable.
    fn load(&self, agent_id: Uuid) -> Vec<String>;

    /// Append one line, creating the record on first write.
    fn append(&self, agent_id: Uuid, line: &str);

    /// Delete the record. Idempotent.
    fn clear(&self, agent_id: Uuid);

    /// Every readable record. Unparsable entries are skipped.
    fn load_all(&self) -> Vec<(Uuid, Vec<String>)>;
}
