//! Settings for courtbot.
//!
//! Layered loading (built-in defaults, then an optional TOML file, then the
//! environment), password lookup in the system keyring, and translation to
//! the validated `courtbot_core::BookingConfig`. This crate never hands out
//! a `BookingConfig` that has not been through the core builder.

use std::path::{Path, PathBuf};

use courtbot_core::config::defaults;
use courtbot_core::{BookingConfig, CoreError, NotificationSettings, mask};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

const KEYRING_SERVICE: &str = "courtbot";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Raw settings as loaded. Unvalidated; turn into a `BookingConfig` with
/// [`Settings::to_booking_config`] before use.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub username: String,

    /// Plaintext password. Prefer the keyring (`courtbot config set-password`).
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_from: Option<String>,

    #[serde(default, skip_serializing)]
    pub email_password: Option<String>,

    #[serde(deserialize_with = "string_or_number")]
    pub zip_code: String,

    /// Club selector token from the club search results.
    pub club_name: String,

    pub login_url: String,

    pub preferred_day: String,

    pub preferred_time: String,

    /// Minutes: 30, 60, 90 or 120.
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,

    pub booking_ahead_days: i64,

    pub max_retries: i64,

    /// Seconds between attempts.
    pub retry_delay: i64,

    /// WebDriver endpoint (chromedriver or a Selenium server).
    pub webdriver_url: String,

    pub headless: bool,

    pub screenshot_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            email_to: None,
            email_from: None,
            email_password: None,
            zip_code: defaults::ZIP_CODE.into(),
            club_name: defaults::CLUB_SELECTOR.into(),
            login_url: defaults::LOGIN_URL.into(),
            preferred_day: defaults::PREFERRED_DAY.into(),
            preferred_time: defaults::PREFERRED_TIME.into(),
            duration: defaults::DURATION.into(),
            booking_ahead_days: defaults::BOOKING_AHEAD_DAYS,
            max_retries: defaults::MAX_RETRIES,
            retry_delay: defaults::RETRY_DELAY_SECS,
            webdriver_url: DEFAULT_WEBDRIVER_URL.into(),
            headless: true,
            screenshot_dir: PathBuf::from(defaults::SCREENSHOT_DIR),
        }
    }
}

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Accept `zip_code = 94085` as well as `zip_code = "94085"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Int(i) => Ok(i.to_string()),
    }
}

// ── Environment ─────────────────────────────────────────────────────

/// Environment variables read verbatim, and the setting each one feeds.
///
/// Figment's env provider parses values, which would turn ZIP `02134` into
/// the number 2134; these are taken as plain strings instead.
const STRING_VARS: &[(&str, &str)] = &[
    ("CITYSPORTS_USERNAME", "username"),
    ("CITYSPORTS_PASSWORD", "password"),
    ("EMAIL_TO", "email_to"),
    ("EMAIL_FROM", "email_from"),
    ("EMAIL_PASSWORD", "email_password"),
    ("ZIP_CODE", "zip_code"),
    ("CLUB_NAME", "club_name"),
    ("LOGIN_URL", "login_url"),
    ("PREFERRED_DAY", "preferred_day"),
    ("PREFERRED_TIME", "preferred_time"),
    ("DURATION", "duration"),
    ("WEBDRIVER_URL", "webdriver_url"),
    ("SCREENSHOT_DIR", "screenshot_dir"),
];

/// Environment variables parsed as numbers or booleans.
const TYPED_VARS: &[&str] = &["BOOKING_AHEAD_DAYS", "MAX_RETRIES", "RETRY_DELAY", "HEADLESS"];

/// Variables `check-env` requires.
pub const REQUIRED_ENV: &[(&str, &str)] = &[
    ("CITYSPORTS_USERNAME", "CitySports login username"),
    ("CITYSPORTS_PASSWORD", "CitySports login password"),
    ("EMAIL_TO", "Recipient email address for notifications"),
    ("EMAIL_FROM", "Sender email address"),
    ("EMAIL_PASSWORD", "Email account password for sending notifications"),
];

/// Variables `check-env` reports on but does not require.
pub const OPTIONAL_ENV: &[(&str, &str)] = &[
    ("BOOKING_AHEAD_DAYS", "Days ahead to book (default: 13)"),
    ("PREFERRED_TIME", "Preferred booking time (default: 08:00 PM)"),
];

fn string_env() -> Serialized<std::collections::BTreeMap<&'static str, String>> {
    let values = STRING_VARS
        .iter()
        .filter_map(|(var, key)| std::env::var(var).ok().map(|v| (*key, v)))
        .collect();
    Serialized::defaults(values)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "courtbot", "courtbot").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("courtbot");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// The layered provider: defaults, then the TOML file at `path` (or the
/// platform default), then the environment.
pub fn figment(path: Option<&Path>) -> Figment {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(string_env())
        .merge(Env::raw().only(TYPED_VARS))
}

/// Load settings from every layer.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings: Settings = figment(path).extract()?;
    Ok(settings)
}

/// Write `settings` as TOML. Secrets are never written.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_entry(username: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{username}/password"),
    )?)
}

/// Store the site password for `username` in the system keyring.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    if username.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "username".into(),
            reason: "set CITYSPORTS_USERNAME or username in the config file first".into(),
        });
    }
    keyring_entry(username)?.set_password(password)?;
    Ok(())
}

impl Settings {
    /// Password from env/file, else from the keyring.
    pub fn resolve_password(&self) -> Option<SecretString> {
        if let Some(pw) = self.password.as_ref().filter(|p| !p.is_empty()) {
            return Some(SecretString::from(pw.clone()));
        }
        if self.username.trim().is_empty() {
            return None;
        }
        keyring_entry(&self.username)
            .ok()
            .and_then(|entry| entry.get_password().ok())
            .map(SecretString::from)
    }

    /// Validate into the core configuration.
    pub fn to_booking_config(&self) -> Result<BookingConfig, ConfigError> {
        let password = self
            .resolve_password()
            .unwrap_or_else(|| SecretString::from(String::new()));

        let notifications = NotificationSettings {
            email_to: non_empty(self.email_to.as_deref()),
            email_from: non_empty(self.email_from.as_deref()),
            email_password: non_empty(self.email_password.as_deref()).map(SecretString::from),
        };

        let config = BookingConfig::builder()
            .username(self.username.trim())
            .password(password)
            .login_url(self.login_url.as_str())
            .zip_code(self.zip_code.trim())
            .club_selector(self.club_name.trim())
            .preferred_day(self.preferred_day.as_str())
            .preferred_time(self.preferred_time.trim())
            .duration(self.duration.trim())
            .booking_ahead_days(self.booking_ahead_days)
            .max_retries(self.max_retries)
            .retry_delay_secs(self.retry_delay)
            .screenshot_dir(self.screenshot_dir.clone())
            .notifications(notifications)
            .build()?;
        Ok(config)
    }

    pub fn webdriver_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.webdriver_url).map_err(|e| ConfigError::Validation {
            field: "webdriver_url".into(),
            reason: format!("{e}: {}", self.webdriver_url),
        })
    }

    /// Username with all but the first three characters hidden.
    pub fn masked_username(&self) -> String {
        mask(&self.username)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_owned)
}

// ── Environment check ───────────────────────────────────────────────

/// Result of checking the booking environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvCheck {
    /// Required variables that are set: (name, masked value, description).
    pub present: Vec<(&'static str, String, &'static str)>,
    /// Required variables that are missing or empty: (name, description).
    pub missing: Vec<(&'static str, &'static str)>,
    /// Optional variables: (name, value if set, description).
    pub optional: Vec<(&'static str, Option<String>, &'static str)>,
}

impl EnvCheck {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check the required and optional variables through `lookup`.
pub fn check_env(lookup: impl Fn(&str) -> Option<String>) -> EnvCheck {
    let mut check = EnvCheck::default();

    for &(var, description) in REQUIRED_ENV {
        match lookup(var).filter(|v| !v.is_empty()) {
            Some(value) => check.present.push((var, mask(&value), description)),
            None => check.missing.push((var, description)),
        }
    }

    for &(var, description) in OPTIONAL_ENV {
        let value = lookup(var).filter(|v| !v.is_empty());
        check.optional.push((var, value, description));
    }

    check
}
