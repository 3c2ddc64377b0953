//! # CLI Layer
//!
//! The CLI is the only place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory, loads config, builds the API
//! - `handle_*()`: Per-command handlers that call the API and print results

use super::print::{
    print_cards, print_drawn, print_full_reading, print_interpretation, print_messages,
    print_readings, print_spread_header, print_spreads,
};
use super::session::run_session;
use super::setup::{
    print_grouped_help, print_help_for_command, Cli, Commands, HistoryCommands, MiscCommands,
    ReadingCommands,
};
use arcana::api::ArcanaApi;
use arcana::commands::config::ConfigAction;
use arcana::commands::{ArcanaPaths, CmdMessage, CmdResult};
use arcana::config::ArcanaConfig;
use arcana::error::{ArcanaError, Result};
use arcana::interpret::InterpretationRequest;
use arcana::store::fs::FileStore;
use clap::Parser;
use directories::ProjectDirs;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

const HOME_ENV: &str = "ARCANA_HOME";
const LOG_ENV: &str = "ARCANA_LOG";

pub(super) struct AppContext {
    pub(super) api: ArcanaApi<FileStore>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(command.name()),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    init_tracing(cli.verbose);

    // Help needs no data directory
    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        return handle_help(command.clone());
    }

    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Reading(cmd)) => match cmd {
            ReadingCommands::Draw {
                spread,
                count,
                stop_after,
                save,
                note,
                question,
                interpret,
            } => {
                let options = DrawOptions {
                    count: count.map(usize::from),
                    stop_after: stop_after.map(usize::from),
                    save,
                    note,
                    question,
                    interpret,
                };
                handle_draw(&mut ctx, &spread, options).await
            }
            ReadingCommands::Session { spread, count } => {
                run_session(&mut ctx, &spread, count.map(usize::from)).await
            }
            ReadingCommands::Spreads => handle_spreads(&ctx),
            ReadingCommands::Deck { query } => handle_deck(&ctx, query),
        },
        Some(Commands::History(cmd)) => match cmd {
            HistoryCommands::History => handle_history(&ctx),
            HistoryCommands::Show { index } => handle_show(&ctx, index),
            HistoryCommands::Interpret { index, question } => {
                handle_interpret(&ctx, index, question).await
            }
            HistoryCommands::Clear { yes } => handle_clear(&mut ctx, yes),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Config { key, value } => handle_config(&mut ctx, key, value),
            MiscCommands::Doctor => handle_doctor(&ctx).await,
            MiscCommands::Help { command } => handle_help(command),
        },
        None => handle_history(&ctx),
    }
}

/// Logs go to stderr. `ARCANA_LOG` takes an `EnvFilter` directive and wins
/// over `-v`.
fn init_tracing(verbose: bool) {
    let fallback_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "arcana", "arcana")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ArcanaError::Config(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let config = ArcanaConfig::load(&data_dir)?;
    let store = FileStore::new(data_dir.clone());
    Ok(AppContext {
        api: ArcanaApi::new(store, ArcanaPaths::new(data_dir), config),
    })
}

struct DrawOptions {
    count: Option<usize>,
    stop_after: Option<usize>,
    save: bool,
    note: Option<String>,
    question: Option<String>,
    interpret: bool,
}

async fn handle_draw(ctx: &mut AppContext, spread: &str, options: DrawOptions) -> Result<()> {
    let language = ctx.api.language();
    let mut session = ctx.api.start_session(spread, options.count)?;
    let result = ctx.api.draw(&mut session, options.stop_after)?;

    if let Some(spread) = &result.spread {
        print_spread_header(spread);
    }
    print_drawn(&result.drawn_cards, language);
    print_messages(&result.messages);

    if options.save || options.note.is_some() {
        let note = options.note.as_deref().unwrap_or("");
        let saved = ctx
            .api
            .save_reading(&session, note, options.question.clone())?;
        print_messages(&saved.messages);
    }

    if options.interpret {
        let request = ctx.api.session_request(&session, options.question);
        let result = interpret_request(ctx, &request).await?;
        print_interpretation_result(&result);
    }
    Ok(())
}

/// Runs one interpretation to completion. A backend that cannot be built
/// (for example a missing API key) is reported like a failed interpretation.
pub(super) async fn interpret_request(
    ctx: &AppContext,
    request: &InterpretationRequest,
) -> Result<CmdResult> {
    let interpreter = match ctx.api.interpreter() {
        Ok(interpreter) => interpreter,
        Err(ArcanaError::InterpretationFailed { reason }) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::error(format!("Interpretation failed: {}", reason)));
            return Ok(result);
        }
        Err(e) => return Err(e),
    };
    eprintln!("Asking {} for an interpretation…", interpreter.name());
    ctx.api.interpret(interpreter.as_ref(), request).await
}

pub(super) fn print_interpretation_result(result: &CmdResult) {
    if let Some(text) = &result.interpretation {
        print_interpretation(text);
    }
    print_messages(&result.messages);
}

fn handle_spreads(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_spreads();
    print_spreads(&result.spreads);
    print_messages(&result.messages);
    Ok(())
}

fn handle_deck(ctx: &AppContext, query: Option<String>) -> Result<()> {
    let result = ctx.api.list_cards(query.as_deref());
    print_cards(&result.cards, ctx.api.language());
    print_messages(&result.messages);
    Ok(())
}

fn handle_history(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_readings();
    print_readings(&result.readings);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, index: usize) -> Result<()> {
    let result = ctx.api.show_reading(index)?;
    for reading in &result.readings {
        print_full_reading(reading);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_interpret(ctx: &AppContext, index: usize, question: Option<String>) -> Result<()> {
    let request = ctx.api.reading_request(index, question)?;
    let result = interpret_request(ctx, &request).await?;
    print_interpretation_result(&result);
    Ok(())
}

/// An unreadable history file still counts as something to delete, so the
/// prompt is skipped only when there is truly nothing on record.
fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let history = ctx.api.history();
    let nothing_stored = history.is_empty() && history.load_warning().is_none();
    if !yes && !nothing_stored {
        let prompt = if history.is_empty() {
            "Delete the unreadable history file? [y/N] ".to_string()
        } else {
            format!("Delete all {} saved reading(s)? [y/N] ", history.len())
        };
        if !confirm(&prompt)? {
            print_messages(&[CmdMessage::info("Aborted.")]);
            return Ok(());
        }
    }
    let result = ctx.api.clear_history()?;
    print_messages(&result.messages);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        print_messages(&[CmdMessage::warning(
            "Refusing to clear history without a terminal; pass --yes.",
        )]);
        return Ok(false);
    }
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.clone(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config_action(action)?;
    if key.is_none() {
        if let Some(config) = &result.config {
            for (k, v) in config.list_all() {
                println!("{} = {}", k, v);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor().await?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_help(command: Option<String>) -> Result<()> {
    match command {
        Some(cmd) => print_help_for_command(&cmd),
        None => print_grouped_help(),
    }
    Ok(())
}
