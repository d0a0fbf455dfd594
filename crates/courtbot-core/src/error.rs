// ── Core error types ──
//
// Errors raised inside one booking attempt. Consumers of the orchestrator
// never see these directly: the attempt boundary flattens them into a
// `BookingOutcome::Failure` carrying the Display text. Configuration
// errors are the exception; they surface before any session exists.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Cannot start browser session at {url}: {reason}")]
    LaunchFailed { url: String, reason: String },

    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    // ── Interaction errors ───────────────────────────────────────────
    #[error("Element not found: {locator}")]
    ElementNotFound { locator: String },

    #[error("Option '{value}' not available in {select}")]
    OptionNotFound { select: String, value: String },

    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("Browser automation error: {message}")]
    Driver { message: String },

    // ── Diagnostics ──────────────────────────────────────────────────
    #[error("Failed to save screenshot to {path}: {reason}")]
    Screenshot { path: String, reason: String },

    // ── Date arithmetic ──────────────────────────────────────────────
    #[error("Booking date {offset} days ahead is out of range")]
    DateOutOfRange { offset: u32 },
}

impl CoreError {
    /// Shorthand for a validation failure on `field`.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

// ── Conversion from driver errors ────────────────────────────────────

impl From<courtbot_driver::Error> for CoreError {
    fn from(err: courtbot_driver::Error) -> Self {
        use courtbot_driver::Error as Driver;

        match err {
            Driver::NoSuchElement { locator } => CoreError::ElementNotFound { locator },
            Driver::NoSuchOption { select, value } => CoreError::OptionNotFound { select, value },
            Driver::Timeout { what, timeout_ms } => CoreError::Timeout { what, timeout_ms },
            Driver::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                }
            }
            Driver::WebDriver { error, message, .. } if error == "no such element" => {
                CoreError::ElementNotFound { locator: message }
            }
            other => CoreError::Driver {
                message: other.to_string(),
            },
        }
    }
}
