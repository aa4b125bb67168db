// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quill",
    about = "Composer autocomplete engine: inspect config, history, and trigger resolution",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the merged configuration as TOML
    ShowConfig,

    /// Inspect or clear the stored composer history
    History {
        #[command(subcommand)]
        cmd: HistoryCmd,
    },

    /// Resolve the active trigger for a buffer, as the composer would
    Resolve {
        /// Buffer text to resolve
        buffer: String,

        /// Cursor byte offset (defaults to end of buffer)
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCmd {
    /// List stored entries for a scope, oldest first
    List {
        /// Scope (workspace id) to list
        #[arg(long, default_value = "default")]
        scope: String,

        /// Show at most this many of the newest entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete all stored entries for a scope
    Clear {
        /// Scope (workspace id) to clear
        #[arg(long, default_value = "default")]
        scope: String,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "quill", &mut std::io::stdout());
}
