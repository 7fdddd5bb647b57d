//! CLI - Command Line Interface for popcorn
//!
//! Every core operation is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! popcorn search "inception" --json
//! popcorn info tt1375666
//! popcorn watched add tt1375666 --rating 9
//! popcorn watched stats
//! ```

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{MAX_USER_RATING, MIN_USER_RATING};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Movie not found
    NotFound = 4,
    /// Watched list could not be persisted
    StorageError = 5,
    /// Movie already in the watched list
    Duplicate = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// popcorn - search movies, rate them, keep a watched list
///
/// Run without arguments to launch the interactive TUI.
#[derive(Parser, Debug)]
#[command(
    name = "popcorn",
    version,
    about = "Search movies, rate them and keep a watched list",
    long_about = "Search the OMDb catalog, inspect and rate movies, and keep a \
                  persisted list of what you watched.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  popcorn                                  Launch interactive TUI\n\
                  popcorn search inception                 Search the catalog\n\
                  popcorn watched add tt1375666 -r 9       Rate and add a movie\n\
                  popcorn watched stats --json             Watched list summary"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the watched list and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for a movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Manage the watched list
    #[command(visible_alias = "w", subcommand)]
    Watched(WatchedCmd),
}

/// Search for movies by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (at least 3 characters)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: usize,
}

/// Get detailed information about a movie
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// IMDB ID (e.g., tt1375666)
    #[arg(required = true)]
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum WatchedCmd {
    /// List watched movies
    #[command(visible_alias = "ls")]
    List,

    /// Aggregate statistics
    Stats,

    /// Fetch a movie, rate it and add it to the list
    Add(WatchedAddCmd),

    /// Remove a movie from the list
    #[command(visible_alias = "rm")]
    Remove(WatchedRemoveCmd),
}

#[derive(Args, Debug)]
pub struct WatchedAddCmd {
    /// IMDB ID (e.g., tt1375666)
    #[arg(required = true)]
    pub id: String,

    /// Your rating, 1-10
    #[arg(long, short = 'r', value_parser = clap::value_parser!(u8).range(MIN_USER_RATING as i64..=MAX_USER_RATING as i64))]
    pub rating: u8,
}

#[derive(Args, Debug)]
pub struct WatchedRemoveCmd {
    /// IMDB ID (e.g., tt1375666)
    #[arg(required = true)]
    pub id: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Result of a watched list mutation
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub status: &'static str,
    pub id: String,
    pub count: usize,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// IMDB ID Validation
// =============================================================================

/// Validate IMDB ID format (tt followed by digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    if id.starts_with("tt") && id.len() >= 9 && id[2..].chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid IMDB ID format (expected tt followed by 7+ digits)")
    }
}

// =============================================================================
// Tests
// =============================================================================
