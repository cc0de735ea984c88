//! # CLI Layer
//!
//! One possible UI client for notezy. This is the only place that parses
//! arguments, resolves the data directory, installs logging, and writes to
//! the terminal. Everything else goes through [`NotezyApi`].

mod args;
mod print;

use args::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use notezy::api::{ConfigAction, NotezyApi};
use notezy::config::NotezyConfig;
use notezy::error::{NotezyError, Result};
use notezy::logging::init_tracing;
use notezy::session::fs::FileSessionProvider;
use notezy::store::fs::FileDocumentStore;
use print::{print_config, print_full_note, print_messages, print_notes, print_profile};
use std::path::PathBuf;

struct AppContext {
    api: NotezyApi<FileDocumentStore, FileSessionProvider>,
    config: NotezyConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;
    tracing::debug!(home = %ctx.api.home().display(), "notezy started");

    match cli.command {
        Some(Commands::Register {
            email,
            password,
            name,
        }) => handle_register(&mut ctx, &email, &password, name),
        Some(Commands::Login { email, password }) => handle_login(&mut ctx, &email, &password),
        Some(Commands::Logout) => handle_simple(ctx.api.logout()),
        Some(Commands::Whoami) => handle_simple(ctx.api.whoami()),
        Some(Commands::Add { text }) => handle_simple(ctx.api.add_note(&text.join(" "))),
        Some(Commands::List { search }) => handle_list(&mut ctx, &search.join(" ")),
        Some(Commands::Search { term }) => handle_list(&mut ctx, &term.join(" ")),
        Some(Commands::View { note }) => handle_view(&mut ctx, &note),
        Some(Commands::Edit { note, text }) => {
            handle_simple(ctx.api.edit_note(&note, &text.join(" ")))
        }
        Some(Commands::Delete { note, yes }) => handle_delete(&mut ctx, &note, yes),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&mut ctx, ""),
    }
}

fn resolve_home(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    ProjectDirs::from("com", "notezy", "notezy")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotezyError::Config("Could not determine data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = resolve_home(cli)?;
    let config = NotezyConfig::load(&home).unwrap_or_default();

    if let Err(e) = init_tracing(&home, &config.log_level) {
        eprintln!("Warning: {}", e);
    }

    let store = FileDocumentStore::new(&home);
    let session = FileSessionProvider::new(&home);
    Ok(AppContext {
        api: NotezyApi::new(store, session, home),
        config,
    })
}

fn handle_simple(result: Result<notezy::api::CmdResult>) -> Result<()> {
    let result = result?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_register(
    ctx: &mut AppContext,
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<()> {
    let result = ctx.api.register(email, password, name)?;
    print_messages(&result.messages);
    if let Some(profile) = &result.profile {
        print_profile(profile);
    }
    Ok(())
}

fn handle_login(ctx: &mut AppContext, email: &str, password: &str) -> Result<()> {
    let result = ctx.api.login(email, password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, filter: &str) -> Result<()> {
    let result = ctx.api.list_notes(filter)?;
    print_notes(&result.listed_notes, ctx.config.line_width);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let result = ctx.api.view_note(selector)?;
    for dn in &result.listed_notes {
        print_full_note(dn);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, selector: &str, yes: bool) -> Result<()> {
    let confirmed = yes || !ctx.config.confirm_delete;
    let result = ctx.api.delete_note(selector, confirmed)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
