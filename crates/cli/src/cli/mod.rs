// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Queue:
  enqueue     Queue an action for delivery
  drain       Replay pending actions now
  status      Show queue summary
  list        List queued actions
  show        Show one queued action
  purge       Remove old synced actions

Connectivity:
  probe       Check whether the remote is reachable
  watch       Probe continuously and replay on reconnect

Setup:
  init        Initialize an offline queue";

const QUICKSTART_HELP: &str = "\
Get started:
  offq init --url http://localhost:8080          Initialize queue
  offq enqueue FORCE_LOGOUT -p '{\"agentId\":\"a1\"}'  Queue an action
  offq status                                    Show pending count
  offq watch                                     Replay when online";

#[derive(Parser)]
#[command(name = "offq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Durable offline queue for side-effecting actions, replayed on reconnect")]
#[command(
    long_about = "Durable offline queue for side-effecting actions.\n\n\
    Actions are stored locally with an idempotency key and replayed in order \
    against the remote once it is reachable."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Run as if offq was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Queue
    // ─────────────────────────────────────────────────────────────────────────
    /// Queue an action, replaying immediately if the remote is reachable
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        offq enqueue FORCE_LOGOUT -p '{\"agentId\":\"a1\"}'           Queue and replay if online\n  \
        offq enqueue FORCE_LOGOUT -p '{\"agentId\":\"a1\"}' --no-drain  Queue without replaying\n  \
        offq enqueue FORCE_LOGOUT --key logout-a1                    Queue under an explicit key"
    )]
    Enqueue {
        /// Action type (e.g. FORCE_LOGOUT)
        #[arg(value_parser = non_empty_string)]
        action: String,

        /// JSON payload passed to the remote
        #[arg(long, short, default_value = "{}")]
        payload: String,

        /// Explicit idempotency key (derived from content and time if omitted)
        #[arg(long, short, value_parser = non_empty_string)]
        key: Option<String>,

        /// Store only; do not probe the remote or replay
        #[arg(long)]
        no_drain: bool,
    },

    /// Replay pending actions now if the remote is reachable
    Drain,

    /// Show pending and synced counts
    Status {
        /// Output format (text, json)
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List queued actions in replay order
    #[command(after_help = "Examples:\n  \
        offq list              List pending actions\n  \
        offq list --all        Include synced actions\n  \
        offq list -o json      Output in JSON format")]
    List {
        /// Include synced actions
        #[arg(long, short)]
        all: bool,

        /// Output format (text, json)
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one queued action
    #[command(arg_required_else_help = true)]
    Show {
        /// Idempotency key
        key: String,

        /// Output format (text, json)
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Remove synced actions older than the retention window
    Purge {
        /// Override the configured window, in seconds (0 removes every synced action)
        #[arg(long, value_name = "SECS")]
        older_than: Option<u64>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Connectivity
    // ─────────────────────────────────────────────────────────────────────────
    /// Check whether the remote is reachable
    Probe,

    /// Probe the remote continuously and replay on every reconnect
    Watch,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize an offline queue in the current directory
    #[command(after_help = "Examples:\n  \
        offq init                                Use the default remote\n  \
        offq init --url https://api.example.com  Use a specific remote\n  \
        offq init --path /tmp/agent              Initialize elsewhere")]
    Init {
        /// Base URL of the remote that replayed actions are sent to
        #[arg(long, value_parser = non_empty_string)]
        url: Option<String>,

        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
