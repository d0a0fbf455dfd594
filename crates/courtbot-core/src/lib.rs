//! Court booking engine.
//!
//! Logs in to the club's reservation site, picks a club, date, duration and
//! time, submits, and checks for the confirmation, retrying the whole
//! sequence a bounded number of times.
//!
//! - **[`BookingConfig`]** -- validated, read-only settings; only obtainable
//!   through [`BookingConfig::builder`].
//! - **[`DateResolver`]** -- today + N days in the site's `M/D/YYYY` encoding.
//! - **[`AutomationPort`]** -- what the orchestrator needs from a browser.
//!   [`WebDriverPort`] is the production implementation.
//! - **[`BookingOrchestrator`]** -- one attempt, one session, one outcome.
//! - **[`RetryController`]** -- repeats attempts with a fixed pause.

pub mod config;
pub mod date;
pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod outcome;
pub mod port;
pub mod retry;
pub mod site;
pub mod webdriver;

// ── Primary re-exports ──────────────────────────────────────────────

pub use config::{
    BookingConfig, BookingConfigBuilder, CourtDuration, NotificationSettings, SettleTimings, mask,
};
pub use date::{BookingDate, Clock, DateResolver, FixedClock, SystemClock};
pub use error::CoreError;
pub use notify::Notifier;
pub use orchestrator::BookingOrchestrator;
pub use outcome::{BookingOutcome, BookingStage, SLOT_TAKEN_REASON};
pub use port::{AutomationPort, Locator, SessionLauncher};
pub use retry::{RetryController, RetryPolicy, RetryReport, Sleeper, TokioSleeper};
pub use webdriver::{ElementWait, WebDriverLauncher, WebDriverPort};
