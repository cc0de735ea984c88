use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notezy", version)]
#[command(about = "Personal notes, synchronized per user", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (notes, accounts, config, logs)
    #[arg(long, global = true, env = "NOTEZY_HOME")]
    pub home: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "NOTEZY_PASSWORD", hide_env_values = true)]
        password: String,

        /// Name shown in the greeting
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Sign in to an existing account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "NOTEZY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Greet the signed-in user
    Whoami,

    /// Add a note
    #[command(alias = "n")]
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List notes, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Only show notes containing this text (case-insensitive)
        #[arg(num_args = 0..)]
        search: Vec<String>,
    },

    /// Search notes (same as `list <term>`)
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// View a note
    #[command(alias = "v")]
    View {
        /// Display index (e.g. 3) or note id
        note: String,
    },

    /// Replace the text of a note
    #[command(alias = "e")]
    Edit {
        /// Display index (e.g. 3) or note id
        note: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Permanently delete a note
    #[command(alias = "rm")]
    Delete {
        /// Display index (e.g. 3) or note id
        note: String,

        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (log-level, line-width, confirm-delete)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
