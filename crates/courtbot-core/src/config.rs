// ── Booking configuration ──
//
// The one validated configuration record the orchestrator reads. Nothing
// here touches disk or the environment: `courtbot-config` gathers raw
// settings and hands them to `BookingConfig::builder()`, which is the only
// way to obtain a `BookingConfig`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::Weekday;
use secrecy::{ExposeSecret, SecretString};
use strum::{EnumIter, EnumString, IntoStaticStr};
use url::Url;

use crate::error::CoreError;
use crate::retry::RetryPolicy;

/// Default values shared by the builder and the settings loader.
pub mod defaults {
    pub const ZIP_CODE: &str = "94085";
    pub const CLUB_SELECTOR: &str = "ctl00$MainContent$gvClub$ctl02$arySelClub";
    pub const LOGIN_URL: &str = "https://www.citysportsfitness.com/Pages/login.aspx";
    pub const PREFERRED_DAY: &str = "Monday";
    pub const PREFERRED_TIME: &str = "08:00 PM";
    pub const DURATION: &str = "120";
    pub const BOOKING_AHEAD_DAYS: i64 = 13;
    pub const MAX_RETRIES: i64 = 5;
    pub const RETRY_DELAY_SECS: i64 = 5;
    pub const SCREENSHOT_DIR: &str = ".";

    pub const CLUB_SEARCH_SETTLE_MS: u64 = 2_000;
    pub const CLUB_RENDER_SETTLE_MS: u64 = 3_000;
    pub const CONFIRMATION_SETTLE_MS: u64 = 3_000;
    pub const POLL_INTERVAL_MS: u64 = 250;
    pub const ELEMENT_TIMEOUT_SECS: u64 = 30;
}

// ── CourtDuration ────────────────────────────────────────────────────

/// Court booking length. The site's duration dropdown only offers these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, strum::Display,
)]
pub enum CourtDuration {
    #[strum(serialize = "30")]
    Thirty,
    #[strum(serialize = "60")]
    Sixty,
    #[strum(serialize = "90")]
    Ninety,
    #[strum(serialize = "120")]
    OneTwenty,
}

impl CourtDuration {
    pub fn minutes(self) -> u32 {
        match self {
            Self::Thirty => 30,
            Self::Sixty => 60,
            Self::Ninety => 90,
            Self::OneTwenty => 120,
        }
    }

    /// The dropdown value (`"30"`, `"60"`, ...).
    pub fn as_option(self) -> &'static str {
        self.into()
    }
}

// ── SettleTimings ────────────────────────────────────────────────────

/// Bounds for the waits where the site offers no completion event.
///
/// `club_search` and `confirmation` are upper bounds on a visibility poll;
/// `club_render` is slept in full because nothing observable changes when
/// the page finishes re-rendering after a club is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTimings {
    pub club_search: Duration,
    pub club_render: Duration,
    pub confirmation: Duration,
    pub poll_interval: Duration,
}

impl Default for SettleTimings {
    fn default() -> Self {
        Self {
            club_search: Duration::from_millis(defaults::CLUB_SEARCH_SETTLE_MS),
            club_render: Duration::from_millis(defaults::CLUB_RENDER_SETTLE_MS),
            confirmation: Duration::from_millis(defaults::CONFIRMATION_SETTLE_MS),
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
        }
    }
}

impl SettleTimings {
    /// All waits zeroed. Handy for fakes that answer instantly.
    pub fn immediate() -> Self {
        Self {
            club_search: Duration::ZERO,
            club_render: Duration::ZERO,
            confirmation: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

// ── NotificationSettings ─────────────────────────────────────────────

/// Email identities. Loaded and carried for a notifier; the core itself
/// never sends mail.
#[derive(Debug, Clone, Default)]
pub struct NotificationSettings {
    pub email_to: Option<String>,
    pub email_from: Option<String>,
    pub email_password: Option<SecretString>,
}

// ── BookingConfig ────────────────────────────────────────────────────

/// Validated, read-only booking configuration.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    username: String,
    password: SecretString,
    login_url: Url,
    zip_code: String,
    club_selector: String,
    preferred_day: Weekday,
    preferred_time: String,
    duration: CourtDuration,
    booking_ahead_days: u32,
    retry: RetryPolicy,
    settle: SettleTimings,
    element_timeout: Duration,
    screenshot_dir: PathBuf,
    notifications: NotificationSettings,
}

impl BookingConfig {
    pub fn builder() -> BookingConfigBuilder {
        BookingConfigBuilder::default()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn club_selector(&self) -> &str {
        &self.club_selector
    }

    /// Informational only; when to run is decided by the external scheduler.
    pub fn preferred_day(&self) -> Weekday {
        self.preferred_day
    }

    pub fn preferred_time(&self) -> &str {
        &self.preferred_time
    }

    pub fn duration(&self) -> CourtDuration {
        self.duration
    }

    pub fn booking_ahead_days(&self) -> u32 {
        self.booking_ahead_days
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn settle(&self) -> SettleTimings {
        self.settle
    }

    pub fn element_timeout(&self) -> Duration {
        self.element_timeout
    }

    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    pub fn notifications(&self) -> &NotificationSettings {
        &self.notifications
    }

    /// The username with everything past the first three characters hidden.
    pub fn masked_username(&self) -> String {
        mask(&self.username)
    }
}

impl fmt::Display for BookingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Username:       {}", self.masked_username())?;
        writeln!(f, "ZIP code:       {}", self.zip_code)?;
        writeln!(f, "Preferred day:  {}", weekday_name(self.preferred_day))?;
        writeln!(f, "Preferred time: {}", self.preferred_time)?;
        writeln!(f, "Duration:       {} minutes", self.duration.minutes())?;
        writeln!(f, "Days ahead:     {}", self.booking_ahead_days)?;
        write!(
            f,
            "Retries:        {} (every {}s)",
            self.retry.max_attempts,
            self.retry.delay.as_secs()
        )
    }
}

/// Show the first three characters of `value`, hide the rest.
pub fn mask(value: &str) -> String {
    if value.chars().count() > 3 {
        let prefix: String = value.chars().take(3).collect();
        format!("{prefix}***")
    } else {
        "***".into()
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Builder ──────────────────────────────────────────────────────────

/// Collects raw settings and validates them all at once in [`build`].
///
/// Numeric settings are taken signed so that negative input reaches
/// validation instead of failing somewhere upstream with a parse error.
///
/// [`build`]: BookingConfigBuilder::build
#[derive(Debug, Clone)]
pub struct BookingConfigBuilder {
    username: String,
    password: SecretString,
    login_url: String,
    zip_code: String,
    club_selector: String,
    preferred_day: String,
    preferred_time: String,
    duration: String,
    booking_ahead_days: i64,
    max_retries: i64,
    retry_delay_secs: i64,
    settle: SettleTimings,
    element_timeout: Duration,
    screenshot_dir: PathBuf,
    notifications: NotificationSettings,
}

impl Default for BookingConfigBuilder {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::from(String::new()),
            login_url: defaults::LOGIN_URL.into(),
            zip_code: defaults::ZIP_CODE.into(),
            club_selector: defaults::CLUB_SELECTOR.into(),
            preferred_day: defaults::PREFERRED_DAY.into(),
            preferred_time: defaults::PREFERRED_TIME.into(),
            duration: defaults::DURATION.into(),
            booking_ahead_days: defaults::BOOKING_AHEAD_DAYS,
            max_retries: defaults::MAX_RETRIES,
            retry_delay_secs: defaults::RETRY_DELAY_SECS,
            settle: SettleTimings::default(),
            element_timeout: Duration::from_secs(defaults::ELEMENT_TIMEOUT_SECS),
            screenshot_dir: PathBuf::from(defaults::SCREENSHOT_DIR),
            notifications: NotificationSettings::default(),
        }
    }
}

impl BookingConfigBuilder {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }

    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    pub fn zip_code(mut self, zip: impl Into<String>) -> Self {
        self.zip_code = zip.into();
        self
    }

    pub fn club_selector(mut self, token: impl Into<String>) -> Self {
        self.club_selector = token.into();
        self
    }

    pub fn preferred_day(mut self, day: impl Into<String>) -> Self {
        self.preferred_day = day.into();
        self
    }

    pub fn preferred_time(mut self, time: impl Into<String>) -> Self {
        self.preferred_time = time.into();
        self
    }

    pub fn duration(mut self, minutes: impl Into<String>) -> Self {
        self.duration = minutes.into();
        self
    }

    pub fn booking_ahead_days(mut self, days: i64) -> Self {
        self.booking_ahead_days = days;
        self
    }

    pub fn max_retries(mut self, retries: i64) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn retry_delay_secs(mut self, secs: i64) -> Self {
        self.retry_delay_secs = secs;
        self
    }

    pub fn settle(mut self, settle: SettleTimings) -> Self {
        self.settle = settle;
        self
    }

    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    pub fn notifications(mut self, notifications: NotificationSettings) -> Self {
        self.notifications = notifications;
        self
    }

    /// Validate every field and produce the immutable config.
    pub fn build(self) -> Result<BookingConfig, CoreError> {
        if self.username.trim().is_empty() || self.password.expose_secret().is_empty() {
            return Err(CoreError::invalid(
                "credentials",
                "username and password are required",
            ));
        }

        let login_url = self.login_url.trim();
        if login_url.is_empty() {
            return Err(CoreError::invalid("login_url", "must not be empty"));
        }
        let login_url =
            Url::parse(login_url).map_err(|e| CoreError::invalid("login_url", e.to_string()))?;

        if self.zip_code.trim().is_empty() {
            return Err(CoreError::invalid("zip_code", "must not be empty"));
        }
        if self.club_selector.trim().is_empty() {
            return Err(CoreError::invalid("club_selector", "must not be empty"));
        }
        if self.preferred_time.trim().is_empty() {
            return Err(CoreError::invalid("preferred_time", "must not be empty"));
        }

        let preferred_day = Weekday::from_str(self.preferred_day.trim()).map_err(|_| {
            CoreError::invalid(
                "preferred_day",
                format!("'{}' is not a day of the week", self.preferred_day),
            )
        })?;

        let duration = CourtDuration::from_str(self.duration.trim()).map_err(|_| {
            CoreError::invalid(
                "duration",
                format!("'{}' must be one of 30, 60, 90, 120", self.duration),
            )
        })?;

        let booking_ahead_days = u32::try_from(self.booking_ahead_days).map_err(|_| {
            CoreError::invalid(
                "booking_ahead_days",
                format!("{} must be a non-negative day count", self.booking_ahead_days),
            )
        })?;

        if self.max_retries < 1 {
            return Err(CoreError::invalid("max_retries", "must be at least 1"));
        }
        let max_attempts = u32::try_from(self.max_retries)
            .map_err(|_| CoreError::invalid("max_retries", "is too large"))?;

        let delay = u64::try_from(self.retry_delay_secs)
            .map_err(|_| CoreError::invalid("retry_delay", "must not be negative"))?;

        Ok(BookingConfig {
            username: self.username,
            password: self.password,
            login_url,
            zip_code: self.zip_code,
            club_selector: self.club_selector,
            preferred_day,
            preferred_time: self.preferred_time,
            duration,
            booking_ahead_days,
            retry: RetryPolicy::new(max_attempts, Duration::from_secs(delay)),
            settle: self.settle,
            element_timeout: self.element_timeout,
            screenshot_dir: self.screenshot_dir,
            notifications: self.notifications,
        })
    }
}
