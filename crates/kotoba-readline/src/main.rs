use std::borrow::Cow::{self, Borrowed, Owned};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tracing_subscriber::EnvFilter;

use kotoba_application::ChatUseCase;
use kotoba_core::KotobaError;
use kotoba_core::settings::{EnglishMode, FuriganaMode, TargetLevel};
use kotoba_core::sync::{CacheRepository, CredentialProvider, RemoteStore, ReplyService};
use kotoba_infrastructure::{FileCacheRepository, FileCredentialStore};
use kotoba_interaction::{RemoteStoreClient, TutorApiClient};

mod render;

const COMMANDS: &[&str] = &[
    "/new", "/sessions", "/switch", "/delete", "/vocab", "/add", "/level", "/auto", "/furigana",
    "/english", "/help", "/quit",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[derive(Parser)]
#[command(name = "kotoba")]
#[command(about = "Kotoba - a conversational Japanese tutor", long_about = None)]
struct Cli {
    /// Override the backend endpoint (defaults to the saved setting)
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ===== Backend Initialization =====
    let cache: Arc<dyn CacheRepository> = Arc::new(FileCacheRepository::new_default()?);
    let credentials: Arc<dyn CredentialProvider> = Arc::new(FileCredentialStore::new_default()?);

    // The endpoint lives in the cached settings; the flag wins when given.
    let endpoint = match &cli.endpoint {
        Some(endpoint) => endpoint.clone(),
        None => match cache.load().await {
            Ok(Some(cached)) => cached.settings.backend_endpoint,
            _ => kotoba_core::settings::Settings::default().backend_endpoint,
        },
    };

    let reply_service: Arc<dyn ReplyService> =
        Arc::new(TutorApiClient::new(&endpoint, credentials.clone()));
    let remote: Arc<dyn RemoteStore> =
        Arc::new(RemoteStoreClient::new(&endpoint, credentials.clone()));

    let usecase = Arc::new(ChatUseCase::load(cache, reply_service, remote, credentials).await);

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Kotoba 日本語 Tutor ===".bright_magenta().bold());
    println!(
        "{}",
        "Type Japanese or English to chat, '/help' for commands, '/quit' to exit.".bright_black()
    );
    println!();

    let settings = usecase.settings().await;
    let session = usecase.active_session().await;
    println!("{}", format!("-- {} --", session.title).bright_black());
    for message in &session.messages {
        render::print_message(message, &settings);
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed.starts_with('/') {
                    if !handle_command(&usecase, trimmed).await {
                        break;
                    }
                } else {
                    send(&usecase, trimmed).await;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "またね！".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Sends one chat message to the active session and renders the outcome.
async fn send(usecase: &ChatUseCase, text: &str) {
    let session_id = usecase.active_session().await.id;
    let settings = usecase.settings().await;

    match usecase.send_message(&session_id, text).await {
        Ok(message) => render::print_message(&message, &settings),
        Err(KotobaError::ReplyPending(_)) => {
            println!("{}", "Still waiting for the previous reply.".yellow());
        }
        Err(e) if e.is_auth() => {
            println!(
                "{}",
                "Authentication failed. Credentials cleared; state reloaded from the server."
                    .red()
            );
        }
        Err(e) => {
            println!("{}", format!("Error: {}", e).red());
        }
    }
}

/// Dispatches a slash command. Returns `false` when the REPL should exit.
async fn handle_command(usecase: &ChatUseCase, input: &str) -> bool {
    let mut parts = input.splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "/quit" => return false,
        "/help" => print_help(),
        "/new" => {
            let session = usecase.create_session().await;
            println!("{}", format!("Started {}", session.title).green());
        }
        "/sessions" => {
            let active = usecase.active_session().await.id;
            for (i, session) in usecase.sessions().await.iter().enumerate() {
                let marker = if session.id == active { "*" } else { " " };
                println!(
                    "{} {} {} ({} messages)",
                    marker,
                    format!("[{}]", i + 1).bright_black(),
                    session.title,
                    session.messages.len()
                );
            }
        }
        "/switch" => match session_id_at(usecase, arg).await {
            Some(id) => {
                usecase.select_session(&id).await;
                let settings = usecase.settings().await;
                let session = usecase.active_session().await;
                println!("{}", format!("-- {} --", session.title).bright_black());
                for message in &session.messages {
                    render::print_message(message, &settings);
                }
            }
            None => println!("{}", "Usage: /switch <number> (see /sessions)".yellow()),
        },
        "/delete" => {
            let id = if arg.is_empty() {
                Some(usecase.active_session().await.id)
            } else {
                session_id_at(usecase, arg).await
            };
            match id {
                Some(id) => {
                    if usecase.delete_session(&id).await {
                        let session = usecase.active_session().await;
                        println!("{}", format!("Deleted. Now in {}", session.title).green());
                    } else {
                        println!("{}", "Cannot delete the last conversation.".yellow());
                    }
                }
                None => println!("{}", "Usage: /delete [number]".yellow()),
            }
        }
        "/vocab" => {
            render::print_vocab(&usecase.vocab_items().await);
        }
        "/add" => {
            if arg.is_empty() {
                println!("{}", "Usage: /add <term>".yellow());
            } else {
                let item = usecase.manual_add(arg).await;
                println!("{}", format!("Added {}", item.term).green());
            }
        }
        "/level" => match TargetLevel::from_str(&arg.to_uppercase()) {
            Ok(level) => {
                let mut settings = usecase.settings().await;
                settings.target_level = level;
                usecase.update_settings(settings).await;
                println!("{}", format!("Target level: {}", level.label()).green());
            }
            Err(_) => println!("{}", "Usage: /level <N5|N4|N3>".yellow()),
        },
        "/auto" => {
            let mut settings = usecase.settings().await;
            settings.auto_add_vocab = !settings.auto_add_vocab;
            let enabled = settings.auto_add_vocab;
            usecase.update_settings(settings).await;
            println!(
                "{}",
                format!(
                    "Auto-add vocabulary: {}",
                    if enabled { "on" } else { "off" }
                )
                .green()
            );
        }
        "/furigana" => match FuriganaMode::from_str(&arg.to_lowercase()) {
            Ok(mode) => {
                let mut settings = usecase.settings().await;
                settings.furigana_mode = mode;
                usecase.update_settings(settings).await;
                println!("{}", format!("Furigana: {}", mode).green());
            }
            Err(_) => println!("{}", "Usage: /furigana <hover|always|hidden>".yellow()),
        },
        "/english" => {
            let mut settings = usecase.settings().await;
            settings.english_mode = match settings.english_mode {
                EnglishMode::Visible => EnglishMode::Hidden,
                EnglishMode::Hidden => EnglishMode::Visible,
            };
            let mode = settings.english_mode;
            usecase.update_settings(settings).await;
            println!("{}", format!("English translation: {}", mode).green());
        }
        _ => {
            println!("{}", "Unknown command. Try /help.".bright_black());
        }
    }

    true
}

/// Resolves a 1-based session number from `/sessions` to its id.
async fn session_id_at(usecase: &ChatUseCase, arg: &str) -> Option<String> {
    let index: usize = arg.parse().ok()?;
    let sessions = usecase.sessions().await;
    sessions.get(index.checked_sub(1)?).map(|s| s.id.clone())
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  /new                  start a new conversation");
    println!("  /sessions             list conversations");
    println!("  /switch <n>           switch to conversation n");
    println!("  /delete [n]           delete a conversation (not the last one)");
    println!("  /vocab                show the vocabulary ledger");
    println!("  /add <term>           add a term by hand");
    println!("  /level <N5|N4|N3>     set the JLPT target level");
    println!("  /auto                 toggle automatic vocabulary capture");
    println!("  /furigana <mode>      hover, always, or hidden");
    println!("  /english              toggle the English translation line");
    println!("  /quit                 exit");
}
