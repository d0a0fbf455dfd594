// WebDriver HTTP client
//
// Wraps `reqwest::Client` with WebDriver URL construction and envelope
// unwrapping. Every endpoint answers `{"value": ...}`; failures carry
// `{"value": {"error", "message"}}` with a 4xx/5xx status. Session-scoped
// commands live in `session.rs` to keep this module focused on transport.

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::capabilities::Capabilities;
use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

#[derive(Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

/// Raw HTTP client for a WebDriver endpoint (chromedriver, selenium, ...).
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted,
/// so every [`Session`] carries its own copy.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WebDriverClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the driver root, e.g. `http://localhost:4444` for
    /// chromedriver or `http://grid:4444/wd/hub` for older selenium grids.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The driver base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Start a new browser session.
    pub async fn new_session(&self, capabilities: &Capabilities) -> Result<Session, Error> {
        let created: NewSession = self
            .command(Method::POST, "session", Some(&capabilities.to_request()))
            .await?;
        debug!(session = %created.session_id, "browser session created");
        Ok(Session::new(self.clone(), created.session_id))
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, tolerating a trailing slash on the base.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a command and unwrap the `value` of the response envelope.
    pub(crate) async fn command<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            trace!(%body, "request body");
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::parse_envelope(resp).await
    }

    /// Parse the `{ value }` envelope, returning the value on success or an
    /// `Error::WebDriver` built from the error object otherwise.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<Envelope<ErrorValue>>(&body) {
                Ok(env) => Error::WebDriver {
                    error: env.value.error,
                    message: env.value.message,
                    status: status.as_u16(),
                },
                Err(_) => Error::WebDriver {
                    error: "unknown error".into(),
                    message: body.chars().take(200).collect(),
                    status: status.as_u16(),
                },
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        Ok(envelope.value)
    }
}
