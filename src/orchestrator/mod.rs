//! Conversation turn controller.
//!
//! One [`Orchestrator`] drives one conversation: it resolves the current
//! profile to a provider adapter, gathers optional memory and search context,
//! calls the provider and writes the exchange back to memory. Only provider
//! and configuration failures reach the caller; memory and search failures
//! degrade to "no context".
//!
//! ```no_run
//! use std::sync::Arc;
//! use parley::prelude::*;
//!
//! # async fn run() -> parley::error::Result<()> {
//! let config = ChatConfig::from_env();
//! let orchestrator = Orchestrator::builder()
//!     .profiles(Arc::new(InMemoryProfileRepository::new()))
//!     .registry(Arc::new(ProviderRegistry::builtin(&config)?))
//!     .credentials(Arc::new(config))
//!     .build()?;
//!
//! if let TurnOutcome::Completed(reply) = orchestrator.send_message("Hello!").await? {
//!     println!("{}", reply.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod notice;
pub mod state;

pub use notice::{ErrorNotice, NoticeBoard, NOTICE_TTL};
pub use state::{TurnOutcome, TurnState};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::CredentialResolver;
use crate::error::ChatError;
use crate::memory::{InMemoryMemoryStore, MemoryStore};
use crate::profile::{AgentProfile, ProfileRepository};
use crate::provider::{GenerateRequest, ProviderAdapter, ProviderRegistry};
use crate::search::{KeywordTrigger, SearchAugmenter, SimulatedSearch};
use crate::types::{Conversation, Message};

/// Speaker label for user lines written to memory.
pub const USER_SPEAKER: &str = "User";
/// Speaker label for assistant lines written to memory.
pub const ASSISTANT_SPEAKER: &str = "Assistant";

/// Render one memory line.
pub fn memory_line(speaker: &str, text: &str) -> String {
    format!("{speaker}: {text}")
}

/// Profile snapshot plus the adapter it resolved to, fixed for one turn.
struct ResolvedTurn {
    profile: AgentProfile,
    adapter: Box<dyn ProviderAdapter>,
}

/// Clears the in-flight flag when the turn ends, however it ends.
///
/// A turn dropped before reaching a terminal state (the caller cancelled the
/// future) is published as [`TurnState::Failed`].
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    state_tx: &'a watch::Sender<TurnState>,
    finished: bool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, state_tx: &'a watch::Sender<TurnState>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag,
                state_tx,
                finished: false,
            })
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let interrupted = self.state_tx.send_replace(TurnState::Failed);
            warn!(state = %interrupted, "turn cancelled before completion");
        }
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Orchestrator {
    profiles: Arc<dyn ProfileRepository>,
    credentials: Arc<dyn CredentialResolver>,
    registry: Arc<ProviderRegistry>,
    memory: Arc<dyn MemoryStore>,
    trigger: Arc<KeywordTrigger>,
    augmenter: Arc<dyn SearchAugmenter>,
    profile: RwLock<AgentProfile>,
    transcript: Mutex<Conversation>,
    in_flight: AtomicBool,
    state_tx: watch::Sender<TurnState>,
    state_rx: watch::Receiver<TurnState>,
    notices: NoticeBoard,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("profile", &self.current_profile().name)
            .field("state", &self.state())
            .field("is_loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Run one conversation turn for `input`.
    ///
    /// Whitespace-only input returns [`TurnOutcome::Skipped`] and a second
    /// call while a turn is running returns [`TurnOutcome::Busy`]; neither
    /// touches the transcript or the provider. Provider and configuration
    /// failures are returned as-is and also posted as an [`ErrorNotice`].
    pub async fn send_message(&self, input: &str) -> Result<TurnOutcome, ChatError> {
        if input.trim().is_empty() {
            return Ok(TurnOutcome::Skipped);
        }
        let Some(mut guard) = InFlightGuard::acquire(&self.in_flight, &self.state_tx) else {
            debug!("turn already in flight; ignoring submission");
            return Ok(TurnOutcome::Busy);
        };

        self.notices.dismiss();
        self.transition(TurnState::Submitting);
        self.lock_transcript().push(Message::user(input));

        match self.run_turn(input).await {
            Ok(reply) => {
                let message = Message::assistant(reply);
                self.lock_transcript().push(message.clone());
                self.transition(TurnState::Completed);
                guard.finish();
                Ok(TurnOutcome::Completed(message))
            }
            Err(err) => {
                warn!(error = %err, category = %err.category(), "turn failed");
                self.notices.post(&err);
                self.transition(TurnState::Failed);
                guard.finish();
                Err(err)
            }
        }
    }

    async fn run_turn(&self, input: &str) -> Result<String, ChatError> {
        let ResolvedTurn { profile, adapter } = self.resolve_turn()?;

        let memory = if profile.memory_enabled {
            self.transition(TurnState::MemoryLoad);
            let lines = self.memory.load(profile.id);
            debug!(agent = %profile.id, lines = lines.len(), "loaded memory");
            Some(lines).filter(|lines| !lines.is_empty())
        } else {
            None
        };

        let search_context = if profile.web_search_enabled {
            self.fetch_search_context(input).await
        } else {
            None
        };

        let request = GenerateRequest::builder()
            .prompt(input)
            .system_prompt(profile.system_prompt.clone())
            .maybe_memory(memory)
            .maybe_search_context(search_context)
            .build();

        self.transition(TurnState::ProviderCall);
        debug!(
            provider = adapter.provider_name(),
            model = adapter.model_id(),
            "calling provider"
        );
        let reply = adapter.generate(&request).await?;

        if profile.memory_enabled {
            self.transition(TurnState::MemoryAppend);
            self.memory
                .append(profile.id, &memory_line(USER_SPEAKER, input));
            self.memory
                .append(profile.id, &memory_line(ASSISTANT_SPEAKER, &reply));
        }

        Ok(reply)
    }

    fn resolve_turn(&self) -> Result<ResolvedTurn, ChatError> {
        let profile = self.current_profile();
        let adapter =
            self.registry
                .resolve(&profile.provider, &profile.model, self.credentials.as_ref())?;
        Ok(ResolvedTurn { profile, adapter })
    }

    /// Search context for `input`, or `None` when not triggered or on failure.
    async fn fetch_search_context(&self, input: &str) -> Option<String> {
        self.transition(TurnState::SearchCheck);
        if !self.trigger.should_trigger(input) {
            return None;
        }

        self.transition(TurnState::SearchFetch);
        match self.augmenter.augment(input).await {
            Ok(result) => Some(result.text),
            Err(err) => {
                warn!(error = %err, "search augmentation failed; continuing without context");
                None
            }
        }
    }

    fn transition(&self, state: TurnState) {
        debug!(%state, "turn state");
        self.state_tx.send_replace(state);
    }

    fn lock_transcript(&self) -> MutexGuard<'_, Conversation> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delete the current profile's memory record.
    pub fn clear_memory(&self) {
        let id = self.current_profile().id;
        info!(agent = %id, "clearing memory");
        self.memory.clear(id);
    }

    /// Memory lines for the current profile.
    pub fn memory(&self) -> Vec<String> {
        self.memory.load(self.current_profile().id)
    }

    /// Replace the active profile. A turn already running keeps the profile
    /// it started with.
    pub fn switch_profile(&self, profile: AgentProfile) {
        info!(agent = %profile.id, name = %profile.name, "switching profile");
        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = profile;
    }

    /// Re-read the current profile from the repository, keeping the active
    /// one if the repository has none.
    pub fn reload_profile(&self) -> AgentProfile {
        match self.profiles.get_current() {
            Some(profile) => {
                self.switch_profile(profile.clone());
                profile
            }
            None => self.current_profile(),
        }
    }

    pub fn current_profile(&self) -> AgentProfile {
        self.profile
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Transcript of this session, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock_transcript().messages().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn state(&self) -> TurnState {
        *self.state_rx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TurnState> {
        self.state_rx.clone()
    }

    /// The most recent surfaced error, until it expires or is superseded.
    pub fn error_notice(&self) -> Option<ErrorNotice> {
        self.notices.current()
    }

    pub fn dismiss_error(&self) {
        self.notices.dismiss();
    }

    pub fn trigger(&self) -> &KeywordTrigger {
        &self.trigger
    }
}

/// Collects the services an [`Orchestrator`] needs.
///
/// Profiles, credentials and the provider registry are required. Memory
/// defaults to a process-local store, search to the simulated backend with
/// the built-in keyword list.
#[derive(Default)]
pub struct OrchestratorBuilder {
    profiles: Option<Arc<dyn ProfileRepository>>,
    credentials: Option<Arc<dyn CredentialResolver>>,
    registry: Option<Arc<ProviderRegistry>>,
    memory: Option<Arc<dyn MemoryStore>>,
    trigger: Option<Arc<KeywordTrigger>>,
    augmenter: Option<Arc<dyn SearchAugmenter>>,
    notice_ttl: Option<Duration>,
}

impl OrchestratorBuilder {
    pub fn profiles(mut self, profiles: Arc<dyn ProfileRepository>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialResolver>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn memory(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn trigger(mut self, trigger: Arc<KeywordTrigger>) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn augmenter(mut self, augmenter: Arc<dyn SearchAugmenter>) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    pub fn notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = Some(ttl);
        self
    }

    /// Build the orchestrator, creating the default profile if none is current.
    pub fn build(self) -> Result<Orchestrator, ChatError> {
        let profiles = self
            .profiles
            .ok_or_else(|| ChatError::Configuration("profile repository is required".into()))?;
        let credentials = self
            .credentials
            .ok_or_else(|| ChatError::Configuration("credential resolver is required".into()))?;
        let registry = self
            .registry
            .ok_or_else(|| ChatError::Configuration("provider registry is required".into()))?;

        let profile = match profiles.get_current() {
            Some(profile) => profile,
            None => {
                let profile = profiles.create_default();
                info!(agent = %profile.id, name = %profile.name, "created default profile");
                profile
            }
        };
        info!(
            agent = %profile.id,
            provider = %profile.provider,
            model = %profile.model,
            "orchestrator ready"
        );

        let (state_tx, state_rx) = watch::channel(TurnState::Idle);

        Ok(Orchestrator {
            profiles,
            credentials,
            registry,
            memory: self
                .memory
                .unwrap_or_else(|| Arc::new(InMemoryMemoryStore::new())),
            trigger: self.trigger.unwrap_or_default(),
            augmenter: self
                .augmenter
                .unwrap_or_else(|| Arc::new(SimulatedSearch::default())),
            profile: RwLock::new(profile),
            transcript: Mutex::new(Conversation::new()),
            in_flight: AtomicBool::new(false),
            state_tx,
            state_rx,
            notices: NoticeBoard::new(self.notice_ttl.unwrap_or(NOTICE_TTL)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::InMemoryProfileRepository;
    use std::collections::HashMap;

    fn bare_builder() -> OrchestratorBuilder {
        Orchestrator::builder()
            .profiles(Arc::new(InMemoryProfileRepository::new()))
            .credentials(Arc::new(HashMap::<String, String>::new()))
            .registry(Arc::new(ProviderRegistry::new()))
    }

    #[test]
    fn build_requires_registry() {
        let err = Orchestrator::builder()
            .profiles(Arc::new(InMemoryProfileRepository::new()))
            .credentials(Arc::new(HashMap::<String, String>::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn build_creates_default_profile_when_none_is_current() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let orchestrator = Orchestrator::builder()
            .profiles(repo.clone())
            .credentials(Arc::new(HashMap::<String, String>::new()))
            .registry(Arc::new(ProviderRegistry::new()))
            .build()
            .unwrap();

        assert_eq!(repo.get_current(), Some(orchestrator.current_profile()));
        assert_eq!(orchestrator.state(), TurnState::Idle);
        assert!(!orchestrator.is_loading());
    }

    #[test]
    fn build_keeps_existing_current_profile() {
        let profile = AgentProfile::new("Existing", "openai", "gpt-4o");
        let orchestrator = Orchestrator::builder()
            .profiles(Arc::new(InMemoryProfileRepository::with_current(profile.clone())))
            .credentials(Arc::new(HashMap::<String, String>::new()))
            .registry(Arc::new(ProviderRegistry::new()))
            .build()
            .unwrap();
        assert_eq!(orchestrator.current_profile(), profile);
    }

    #[test]
    fn in_flight_guard_is_exclusive_and_resets_on_drop() {
        let flag = AtomicBool::new(false);
        let (state_tx, _state_rx) = watch::channel(TurnState::Idle);

        let mut guard = InFlightGuard::acquire(&flag, &state_tx).unwrap();
        assert!(InFlightGuard::acquire(&flag, &state_tx).is_none());
        state_tx.send_replace(TurnState::Completed);
        guard.finish();
        drop(guard);

        assert_eq!(*state_tx.borrow(), TurnState::Completed);
        assert!(InFlightGuard::acquire(&flag, &state_tx).is_some());
    }

    #[test]
    fn unfinished_guard_publishes_failed_on_drop() {
        let flag = AtomicBool::new(false);
        let (state_tx, state_rx) = watch::channel(TurnState::Idle);

        let guard = InFlightGuard::acquire(&flag, &state_tx).unwrap();
        state_tx.send_replace(TurnState::ProviderCall);
        drop(guard);

        assert_eq!(*state_rx.borrow(), TurnState::Failed);
        assert!(!flag.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn unresolvable_provider_fails_with_configuration_error() {
        let orchestrator = bare_builder().build().unwrap();

        let err = orchestrator.send_message("hi").await.unwrap_err();

        assert!(matches!(err, ChatError::Configuration(_)));
        assert_eq!(orchestrator.state(), TurnState::Failed);
        assert_eq!(orchestrator.messages().len(), 1);
        assert!(orchestrator.error_notice().is_some());
        assert!(!orchestrator.is_loading());
    }

    #[test]
    fn memory_lines_use_speaker_prefix() {
        assert_eq!(memory_line(USER_SPEAKER, "hi"), "User: hi");
        assert_eq!(memory_line(ASSISTANT_SPEAKER, "hello"), "Assistant: hello");
    }
}
