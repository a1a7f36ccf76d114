//! CLI command handlers.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::{ChatArgs, KeyCommands, KeywordsCommands, MemoryCommands, ProfileCommands, ProfileSetArgs};
use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::memory::{FileMemoryStore, MemoryStore};
use crate::orchestrator::{Orchestrator, TurnOutcome};
use crate::profile::{AgentProfile, FileProfileRepository, ProfileRepository, ProfileUpdate};
use crate::provider::ProviderRegistry;
use crate::search::{KeywordTrigger, SimulatedSearch};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn keyword_trigger(config: &ChatConfig) -> KeywordTrigger {
    config
        .settings()
        .search_keywords
        .clone()
        .map(KeywordTrigger::new)
        .unwrap_or_default()
}

fn current_profile(repo: &FileProfileRepository) -> AgentProfile {
    repo.get_current().unwrap_or_else(|| repo.create_default())
}

fn build_orchestrator(config: &ChatConfig) -> Result<Orchestrator, ChatError> {
    Orchestrator::builder()
        .profiles(Arc::new(FileProfileRepository::new(config.profiles_path())))
        .registry(Arc::new(ProviderRegistry::builtin(config)?))
        .memory(Arc::new(FileMemoryStore::new(config.memory_dir())))
        .trigger(Arc::new(keyword_trigger(config)))
        .augmenter(Arc::new(SimulatedSearch::new(config.search_latency())))
        .credentials(Arc::new(config.clone()))
        .build()
}

/// Handle `parley chat [PROMPT]`.
pub async fn handle_chat(config: ChatConfig, args: ChatArgs) -> CliResult {
    let orchestrator = build_orchestrator(&config)?;

    let mut profile = orchestrator.current_profile();
    profile.update(ProfileUpdate {
        provider: args.provider,
        model: args.model,
        system_prompt: args.system,
        memory_enabled: args.memory.then_some(true),
        web_search_enabled: args.search.then_some(true),
        ..Default::default()
    });
    orchestrator.switch_profile(profile);

    if let Some(prompt) = args.prompt {
        return match orchestrator.send_message(&prompt).await? {
            TurnOutcome::Completed(reply) => {
                println!("{}", reply.text);
                Ok(())
            }
            TurnOutcome::Skipped | TurnOutcome::Busy => Ok(()),
        };
    }

    let profile = orchestrator.current_profile();
    eprintln!(
        "{} ({}:{}). /clear wipes memory, /exit quits",
        profile.name, profile.provider, profile.model
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/exit" | "/quit" => break,
            "/clear" => {
                orchestrator.clear_memory();
                eprintln!("memory cleared");
                continue;
            }
            _ => {}
        }

        match orchestrator.send_message(&line).await {
            Ok(TurnOutcome::Completed(reply)) => println!("{}", reply.text),
            Ok(_) => {}
            Err(err) => {
                eprintln!("❌ {err}");
                eprintln!("   {}", err.recovery_suggestion().hint());
            }
        }
    }

    Ok(())
}

/// Handle `parley memory ...`.
pub fn handle_memory(config: &ChatConfig, command: MemoryCommands) -> CliResult {
    let store = FileMemoryStore::new(config.memory_dir());

    match command {
        MemoryCommands::Show => {
            let profile = current_profile(&FileProfileRepository::new(config.profiles_path()));
            let lines = store.load(profile.id);
            if lines.is_empty() {
                println!("No memory for {}", profile.name);
            }
            for line in lines {
                println!("{line}");
            }
        }
        MemoryCommands::Clear => {
            let profile = current_profile(&FileProfileRepository::new(config.profiles_path()));
            store.clear(profile.id);
            println!("Cleared memory for {}", profile.name);
        }
        MemoryCommands::List => {
            let records = store.load_all();
            if records.is_empty() {
                println!("No stored memory in {}", store.dir().display());
            }
            for (agent_id, lines) in records {
                println!("{agent_id}  {} lines", lines.len());
            }
        }
    }

    Ok(())
}

/// Handle `parley keywords ...`.
pub fn handle_keywords(config: &ChatConfig, command: KeywordsCommands) -> CliResult {
    let trigger = keyword_trigger(config);

    match command {
        KeywordsCommands::List => {
            for keyword in trigger.keywords() {
                println!("{keyword}");
            }
        }
        KeywordsCommands::Test(args) => {
            let verdict = if trigger.should_trigger(&args.text) {
                "search"
            } else {
                "no search"
            };
            println!("{verdict}");
        }
    }

    Ok(())
}

/// Handle `parley profile ...`.
pub fn handle_profile(config: &ChatConfig, command: ProfileCommands) -> CliResult {
    let repo = FileProfileRepository::new(config.profiles_path());
    let mut profile = current_profile(&repo);

    match command {
        ProfileCommands::Show => {}
        ProfileCommands::Set(args) => {
            let ProfileSetArgs {
                name,
                provider,
                model,
                system,
                memory,
                search,
            } = args;
            profile.update(ProfileUpdate {
                name,
                provider,
                model,
                system_prompt: system,
                memory_enabled: memory,
                web_search_enabled: search,
            });
            repo.save(profile.clone())?;
        }
    }

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// Handle `parley key ...`.
pub fn handle_key(config: &ChatConfig, command: KeyCommands) -> CliResult {
    let Some(store) = config.credential_store() else {
        return Err(ChatError::Configuration("no credential store configured".into()).into());
    };

    match command {
        KeyCommands::Set(args) => {
            store.save(&args.provider, &args.key)?;
            println!("✅ Saved key for {}", args.provider);
        }
        KeyCommands::Remove(args) => {
            store.delete(&args.provider)?;
            println!("Removed key for {}", args.provider);
        }
        KeyCommands::Status => {
            for provider in ["openai", "openrouter"] {
                let status = if config.has_credentials(provider) {
                    "✅ configured"
                } else {
                    "❌ missing"
                };
                println!("{provider:<12} {status}");
            }
            println!("   Store: {}", store.path().display());
        }
    }

    Ok(())
}
