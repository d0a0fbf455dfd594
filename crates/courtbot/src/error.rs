//! CLI error types with miette diagnostics.
//!
//! Maps config and core errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use courtbot_config::ConfigError;
use courtbot_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(courtbot::validation),
        help(
            "Settings come from the environment (CITYSPORTS_USERNAME, DURATION, ...)\n\
             or the config file. Run: courtbot config show"
        )
    )]
    Validation { field: String, reason: String },

    #[error("Missing credentials: {reason}")]
    #[diagnostic(
        code(courtbot::no_credentials),
        help(
            "Set CITYSPORTS_USERNAME and CITYSPORTS_PASSWORD,\n\
             or store the password with: courtbot config set-password"
        )
    )]
    NoCredentials { reason: String },

    #[error(transparent)]
    #[diagnostic(code(courtbot::config))]
    Config(Box<figment::Error>),

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(courtbot::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("{count} required environment variable(s) missing")]
    #[diagnostic(code(courtbot::env_missing))]
    EnvCheckFailed { count: usize },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Keyring error: {reason}")]
    #[diagnostic(
        code(courtbot::keyring),
        help("Is a secret service (GNOME Keyring, KWallet, macOS Keychain) available?")
    )]
    Keyring { reason: String },

    #[error("{message}")]
    #[diagnostic(code(courtbot::booking))]
    Booking { message: String },

    #[error("prompt failed: {0}")]
    #[diagnostic(code(courtbot::prompt))]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. }
            | Self::NoCredentials { .. }
            | Self::Config(_)
            | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidConfig { field: "credentials", reason } => {
                CliError::NoCredentials { reason }
            }
            CoreError::InvalidConfig { field, reason } => CliError::Validation {
                field: field.into(),
                reason,
            },
            CoreError::DateOutOfRange { offset } => CliError::Validation {
                field: "days".into(),
                reason: format!("{offset} days ahead is out of range"),
            },
            other => CliError::Booking {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Keyring(reason) => CliError::Keyring { reason },
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Core(e) => e.into(),
        }
    }
}

impl From<courtbot_driver::Error> for CliError {
    fn from(err: courtbot_driver::Error) -> Self {
        CoreError::from(err).into()
    }
}
