use thiserror::Error;

/// Top-level error type for the `courtbot-driver` crate.
///
/// Covers transport failures talking to the WebDriver endpoint and the
/// structured failures the endpoint reports inside its `{"value": ...}`
/// envelope. `courtbot-core` maps these into booking-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A bounded wait ran out before its condition held.
    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    // ── WebDriver protocol ──────────────────────────────────────────
    /// Structured failure from the driver (`{"value":{"error","message"}}`).
    #[error("WebDriver error (HTTP {status}) {error}: {message}")]
    WebDriver {
        error: String,
        message: String,
        status: u16,
    },

    /// No element matched the locator.
    #[error("No element matches {locator}")]
    NoSuchElement { locator: String },

    /// A `<select>` has no option with the requested value or label.
    #[error("No option '{value}' in {select}")]
    NoSuchOption { select: String, value: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The screenshot payload could not be decoded.
    #[error("Screenshot decode failed: {0}")]
    Screenshot(String),
}

impl Error {
    /// Returns `true` if the driver reported that an element lookup failed.
    pub fn is_no_such_element(&self) -> bool {
        match self {
            Self::NoSuchElement { .. } => true,
            Self::WebDriver { error, .. } => error == "no such element",
            _ => false,
        }
    }

    /// Returns `true` if the element may still show up or settle: it is
    /// missing, was detached by a re-render, or cannot take input yet.
    pub fn is_pending_element(&self) -> bool {
        match self {
            Self::NoSuchElement { .. } | Self::NoSuchOption { .. } => true,
            Self::WebDriver { error, .. } => matches!(
                error.as_str(),
                "no such element" | "stale element reference" | "element not interactable"
            ),
            _ => false,
        }
    }
}
