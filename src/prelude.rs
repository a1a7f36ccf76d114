//! Convenience re-exports for common use.

pub use crate::config::{ChatConfig, CredentialResolver, FileCredentialStore};
pub use crate::error::{ChatError, Result};
pub use crate::memory::{FileMemoryStore, InMemoryMemoryStore, MemoryStore};
pub use crate::orchestrator::{ErrorNotice, Orchestrator, TurnOutcome, TurnState};
pub use crate::profile::{
    AgentProfile, FileProfileRepository, InMemoryProfileRepository, ProfileRepository,
};
pub use crate::provider::{GenerateRequest, ProviderAdapter, ProviderRegistry};
pub use crate::search::{KeywordTrigger, SearchAugmenter, SearchResult, SimulatedSearch};
pub use crate::types::{Message, Role};
