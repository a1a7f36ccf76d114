//! Parley: conversational assistant core
//!
//! Routes user messages to a pluggable chat-completions provider, optionally
//! augmenting each request with per-agent conversation memory and search
//! context, and writes the exchange back to memory.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use parley::prelude::*;
//!
//! # async fn example() -> parley::error::Result<()> {
//! let config = ChatConfig::from_env();
//! let orchestrator = Orchestrator::builder()
//!     .profiles(Arc::new(FileProfileRepository::new(config.profiles_path())))
//!     .memory(Arc::new(FileMemoryStore::new(config.memory_dir())))
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

pub mod config;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod prelude;
pub mod profile;
pub mod provider;
pub mod search;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
