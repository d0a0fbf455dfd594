//! Clap derive structures for the `courtbot` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// courtbot -- reserve a racquetball/squash court ahead of time
#[derive(Debug, Parser)]
#[command(
    name = "courtbot",
    version,
    about = "Book a racquetball/squash court on the club reservation site",
    long_about = "Logs in to the club's reservation site through a WebDriver endpoint,\n\
        selects the configured club, date, duration and time, and submits the\n\
        reservation, retrying a bounded number of times.\n\n\
        Meant to be run by an external scheduler (cron, CI) once per booking window.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "COURTBOT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint (overrides config)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the booking with retries
    Book(BookArgs),

    /// Check that the required environment variables are set
    CheckEnv,

    /// Print the date token the next booking would select
    Date(DateArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Total attempts (overrides MAX_RETRIES)
    #[arg(long)]
    pub max_retries: Option<i64>,

    /// Seconds between attempts (overrides RETRY_DELAY)
    #[arg(long)]
    pub retry_delay: Option<i64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

#[derive(Debug, Args)]
pub struct DateArgs {
    /// Days from today (defaults to BOOKING_AHEAD_DAYS)
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub days: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,

    /// Write a config file populated with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Store the site password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
