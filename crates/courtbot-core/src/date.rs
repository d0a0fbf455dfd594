//! Booking date resolution.
//!
//! The reservation site's date dropdown is keyed by `M/D/YYYY` with no
//! leading zeros on month or day (`1/5/2025`, `12/31/2025`). The date is
//! always "today + N days", where today is read from a [`Clock`] at the
//! moment of each attempt so a run that crosses midnight moves with it.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime};

use crate::error::CoreError;

// ── Clock ────────────────────────────────────────────────────────────

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ── BookingDate ──────────────────────────────────────────────────────

/// A calendar date that renders in the site's `M/D/YYYY` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookingDate(NaiveDate);

impl BookingDate {
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The dropdown value for this date.
    pub fn token(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BookingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.0.month(), self.0.day(), self.0.year())
    }
}

impl From<NaiveDate> for BookingDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// `today + offset` days.
pub fn booking_date(today: NaiveDate, offset: u32) -> Result<BookingDate, CoreError> {
    today
        .checked_add_days(Days::new(u64::from(offset)))
        .map(BookingDate)
        .ok_or(CoreError::DateOutOfRange { offset })
}

// ── DateResolver ─────────────────────────────────────────────────────

/// Resolves booking dates against a clock.
#[derive(Clone)]
pub struct DateResolver {
    clock: Arc<dyn Clock>,
}

impl DateResolver {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Resolver backed by the local wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Resolver pinned to `now`.
    pub fn fixed(now: NaiveDateTime) -> Self {
        Self::new(Arc::new(FixedClock(now)))
    }

    /// The current local time according to the underlying clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// The date `offset` days after the clock's current day.
    pub fn resolve(&self, offset: u32) -> Result<BookingDate, CoreError> {
        booking_date(self.clock.today(), offset)
    }
}

impl fmt::Debug for DateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateResolver")
            .field("now", &self.clock.now())
            .finish()
    }
}
