//! Process-local memory store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::{push_bounded, MemoryRecord, MemoryStore};

/// Keeps records in a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryMemoryStore {
    records: RwLock<HashMap<Uuid, MemoryRecord>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full record for `agent_id`, including its last-write timestamp.
    pub fn record(&self, agent_id: Uuid) -> Option<MemoryRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&agent_id)
            .cloned()
    }
}

impl MemoryStore for InMemoryMemoryStore {
    fn load(&self, agent_id: Uuid) -> Vec<String> {
        self.record(agent_id)
            .map(|record| record.messages)
            .unwrap_or_default()
    }

    fn append(&self, agent_id: Uuid, line: &str) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let mut lines = records
            .remove(&agent_id)
            .map(|record| record.messages)
            .unwrap_or_default();
        push_bounded(&mut lines, line.to_string());
        records.insert(agent_id, MemoryRecord::new(agent_id, lines));
    }

    fn clear(&self, agent_id: Uuid) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&agent_id);
    }

    fn load_all(&self) -> Vec<(Uuid, Vec<String>)> {
        let mut all: Vec<(Uuid, Vec<String>)> = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|record| (record.agent_id, record.messages.clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }
}
