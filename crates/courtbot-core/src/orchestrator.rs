// ── Booking orchestrator ──
//
// Runs the reservation sequence exactly once against an automation port:
//
//   Init → Authenticated → OnReservationPage → ClubSelected
//        → SlotConfigured → Submitted → Success | Failure
//
// Any error along the way ends the attempt as a `Failure` carrying the
// error text, after a best-effort screenshot. The port is closed on every
// path, including when the screenshot itself fails.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::{debug, error, info, warn};

use crate::config::BookingConfig;
use crate::date::{BookingDate, DateResolver};
use crate::error::CoreError;
use crate::outcome::{BookingOutcome, BookingStage};
use crate::port::{AutomationPort, Locator, SessionLauncher};
use crate::site;

/// Drives one booking attempt per call. Holds no per-attempt state.
#[derive(Debug, Clone)]
pub struct BookingOrchestrator {
    config: Arc<BookingConfig>,
    dates: DateResolver,
}

impl BookingOrchestrator {
    pub fn new(config: Arc<BookingConfig>, dates: DateResolver) -> Self {
        Self { config, dates }
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// The date this attempt would book, as of now.
    pub fn booking_date(&self) -> Result<BookingDate, CoreError> {
        self.dates.resolve(self.config.booking_ahead_days())
    }

    /// Launch a session and run one attempt in it.
    ///
    /// A session that cannot be started is a failed attempt like any other;
    /// there is nothing to screenshot or release.
    pub async fn attempt_with<L: SessionLauncher>(&self, launcher: &L) -> BookingOutcome {
        match launcher.launch().await {
            Ok(port) => self.attempt_booking(port).await,
            Err(e) => {
                error!(error = %e, "could not start a browser session");
                BookingOutcome::failure(e.to_string())
            }
        }
    }

    /// Run the full sequence once in `port`, then release it.
    pub async fn attempt_booking<P: AutomationPort>(&self, mut port: P) -> BookingOutcome {
        info!(at = %self.dates.now(), "starting court booking process");

        let mut stage = BookingStage::Init;
        let outcome = match self.run(&mut port, &mut stage).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%stage, error = %e, "booking attempt aborted");
                self.capture_diagnostics(&mut port).await;
                BookingOutcome::failure(e.to_string())
            }
        };

        if let Err(e) = port.close().await {
            warn!(error = %e, "failed to release browser session");
        }
        outcome
    }

    async fn run<P: AutomationPort>(
        &self,
        port: &mut P,
        stage: &mut BookingStage,
    ) -> Result<BookingOutcome, CoreError> {
        self.login(port).await?;
        advance(stage, BookingStage::Authenticated);

        self.open_reservations(port).await?;
        advance(stage, BookingStage::OnReservationPage);

        self.select_club(port).await?;
        advance(stage, BookingStage::ClubSelected);

        self.configure_slot(port).await?;
        advance(stage, BookingStage::SlotConfigured);

        port.click(&site::save_button()).await?;
        advance(stage, BookingStage::Submitted);

        let settle = self.config.settle();
        let confirmed = poll_visible(
            port,
            &site::confirmation_marker(),
            settle.confirmation,
            settle.poll_interval,
        )
        .await?;

        if confirmed {
            info!("court booked successfully");
            Ok(BookingOutcome::Success)
        } else {
            warn!("no confirmation shown, court may not be available");
            Ok(BookingOutcome::slot_taken())
        }
    }

    // ── Steps ────────────────────────────────────────────────────────

    async fn login<P: AutomationPort>(&self, port: &mut P) -> Result<(), CoreError> {
        port.open(self.config.login_url()).await?;
        port.wait_until_idle().await?;
        info!("loaded login page");

        let username = site::username_field();
        let timeout = self.config.element_timeout();
        wait_for_visible(port, &username, timeout, self.config.settle().poll_interval).await?;
        port.fill_field(&username, self.config.username()).await?;
        port.fill_field(&site::password_field(), self.config.password().expose_secret())
            .await?;
        port.click(&site::login_button()).await?;
        port.wait_until_idle().await?;
        info!(user = %self.config.masked_username(), "logged in");
        Ok(())
    }

    async fn open_reservations<P: AutomationPort>(&self, port: &mut P) -> Result<(), CoreError> {
        port.click(&site::reservations_link()).await?;
        port.click(&site::racquetball_link()).await?;
        info!("navigated to court reservations");
        Ok(())
    }

    async fn select_club<P: AutomationPort>(&self, port: &mut P) -> Result<(), CoreError> {
        let settle = self.config.settle();

        port.click(&site::change_club_button()).await?;
        port.fill_field(&site::zip_code_field(), self.config.zip_code()).await?;
        port.click(&site::find_club_button()).await?;

        // Search results arrive without a completion event; the result
        // radio showing up is the closest thing to one.
        let club = site::club_result(self.config.club_selector());
        poll_visible(port, &club, settle.club_search, settle.poll_interval).await?;
        port.click(&club).await?;
        info!(zip = self.config.zip_code(), "selected club");

        // Nothing observable marks the end of the re-render after selection.
        port.wait_millis(millis(settle.club_render)).await;
        Ok(())
    }

    async fn configure_slot<P: AutomationPort>(&self, port: &mut P) -> Result<(), CoreError> {
        let date = self.booking_date()?;
        port.select_option(&site::date_dropdown(), &date.token()).await?;
        info!(%date, "selected date");

        let duration = self.config.duration();
        port.select_option(&site::duration_dropdown(), site::duration_value(duration))
            .await?;
        port.select_option(&site::time_dropdown(), self.config.preferred_time()).await?;
        info!(
            time = self.config.preferred_time(),
            minutes = duration.minutes(),
            "selected time slot"
        );
        Ok(())
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    fn screenshot_path(&self) -> PathBuf {
        let stamp = self.dates.now().format("%Y%m%d_%H%M%S");
        self.config.screenshot_dir().join(format!("error_{stamp}.png"))
    }

    async fn capture_diagnostics<P: AutomationPort>(&self, port: &mut P) {
        let path = self.screenshot_path();
        match port.capture_screenshot(&path).await {
            Ok(()) => info!(path = %path.display(), "screenshot saved"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not save screenshot"),
        }
    }
}

fn advance(stage: &mut BookingStage, next: BookingStage) {
    debug!(from = %stage, to = %next, "booking stage");
    *stage = next;
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Check `locator` every `interval` until it is visible or `bound` has been
/// spent waiting. `Ok(false)` means the bound ran out.
async fn poll_visible<P: AutomationPort>(
    port: &mut P,
    locator: &Locator,
    bound: Duration,
    interval: Duration,
) -> Result<bool, CoreError> {
    let bound = millis(bound);
    let interval = millis(interval).max(1);
    let mut waited = 0;

    loop {
        if port.is_visible(locator).await? {
            return Ok(true);
        }
        if waited >= bound {
            return Ok(false);
        }
        let step = interval.min(bound - waited);
        port.wait_millis(step).await;
        waited += step;
    }
}

/// Like [`poll_visible`], but running out of time is an error.
async fn wait_for_visible<P: AutomationPort>(
    port: &mut P,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> Result<(), CoreError> {
    if poll_visible(port, locator, timeout, interval).await? {
        Ok(())
    } else {
        Err(CoreError::Timeout {
            what: format!("{locator} to become visible"),
            timeout_ms: millis(timeout),
        })
    }
}
