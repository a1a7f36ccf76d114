//! Shared test helpers: scripted provider, recording memory store and
//! search doubles.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use parley::config::CredentialResolver;
use parley::error::ChatError;
use parley::memory::{InMemoryMemoryStore, MemoryStore};
use parley::orchestrator::{Orchestrator, OrchestratorBuilder};
use parley::profile::{AgentProfile, InMemoryProfileRepository};
use parley::provider::{GenerateRequest, ProviderAdapter, ProviderFactory, ProviderRegistry};
use parley::search::{SearchAugmenter, SearchResult};
use uuid::Uuid;

pub const MOCK_PROVIDER: &str = "mock";
pub const MOCK_MODEL: &str = "mock-model";

/// Replies queued ahead of time; every request is captured.
#[derive(Default)]
pub struct Script {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl Script {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn fail(&self, err: ChatError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    /// Hold every response for `delay` before answering.
    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// A provider adapter that plays back a [`Script`].
pub struct ScriptedProvider {
    model_id: String,
    script: Arc<Script>,
}

#[async_trait]
impl ProviderAdapter for ScriptedProvider {
    fn provider_name(&self) -> &str {
        MOCK_PROVIDER
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ChatError> {
        self.script.requests.lock().unwrap().push(request.clone());
        let delay = *self.script.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("Mock response".to_string()))
    }
}

pub struct ScriptedFactory {
    script: Arc<Script>,
}

impl ProviderFactory for ScriptedFactory {
    fn provider_keys(&self) -> &[&str] {
        &[MOCK_PROVIDER]
    }

    fn create(&self, _api_key: String, model_id: &str) -> Result<Box<dyn ProviderAdapter>, ChatError> {
        Ok(Box::new(ScriptedProvider {
            model_id: model_id.to_string(),
            script: self.script.clone(),
        }))
    }
}

pub fn scripted_registry(script: Arc<Script>) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(ScriptedFactory { script }));
    registry
}

pub fn credentials(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Memory store that records every call on top of an in-memory store.
#[derive(Default)]
pub struct RecordingMemory {
    inner: InMemoryMemoryStore,
    appends: Mutex<Vec<(Uuid, String)>>,
    loads: Mutex<usize>,
}

impl RecordingMemory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn appends(&self) -> Vec<(Uuid, String)> {
        self.appends.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        *self.loads.lock().unwrap()
    }

    pub fn seed(&self, agent_id: Uuid, lines: &[&str]) {
        for line in lines {
            self.inner.append(agent_id, line);
        }
    }
}

impl MemoryStore for RecordingMemory {
    fn load(&self, agent_id: Uuid) -> Vec<String> {
        *self.loads.lock().unwrap() += 1;
        self.inner.load(agent_id)
    }

    fn append(&self, agent_id: Uuid, line: &str) {
        self.appends.lock().unwrap().push((agent_id, line.to_string()));
        self.inner.append(agent_id, line);
    }

    fn clear(&self, agent_id: Uuid) {
        self.inner.clear(agent_id);
    }

    fn load_all(&self) -> Vec<(Uuid, Vec<String>)> {
        self.inner.load_all()
    }
}

/// Augmenter that always fails.
pub struct FailingSearch;

#[async_trait]
impl SearchAugmenter for FailingSearch {
    async fn augment(&self, _query: &str) -> Result<SearchResult, ChatError> {
        Err(ChatError::ServiceUnavailable("search backend down".into()))
    }
}

/// Augmenter returning fixed text and counting calls.
#[derive(Default)]
pub struct FixedSearch {
    calls: Mutex<Vec<String>>,
}

impl FixedSearch {
    pub const TEXT: &'static str = "fresh results";

    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchAugmenter for FixedSearch {
    async fn augment(&self, query: &str) -> Result<SearchResult, ChatError> {
        self.calls.lock().unwrap().push(query.to_string());
        Ok(SearchResult {
            query: query.to_string(),
            text: Self::TEXT.to_string(),
        })
    }
}

pub fn mock_profile() -> AgentProfile {
    AgentProfile::new("Tester", MOCK_PROVIDER, MOCK_MODEL).with_system_prompt("Be terse.")
}

/// Builder wired to a scripted provider with a key for it.
pub fn builder_for(profile: AgentProfile, script: Arc<Script>) -> OrchestratorBuilder {
    Orchestrator::builder()
        .profiles(Arc::new(InMemoryProfileRepository::with_current(profile)))
        .credentials(Arc::new(credentials(&[(MOCK_PROVIDER, "test-key")])))
        .registry(Arc::new(scripted_registry(script)))
}

/// Resolver that counts lookups.
#[derive(Default)]
pub struct CountingResolver {
    pub lookups: Mutex<Vec<String>>,
}

impl CredentialResolver for CountingResolver {
    fn get(&self, service_id: &str) -> Option<String> {
        self.lookups.lock().unwrap().push(service_id.to_string());
        None
    }
}
