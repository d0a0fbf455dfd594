// ── Retry control ──
//
// Bounded re-attempts around one booking run. The controller only ever
// sees `BookingOutcome`; every error has already been folded into a
// failure by the time it gets here, so slot-taken and infrastructure
// failures are retried the same way.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::notify::Notifier;
use crate::outcome::BookingOutcome;

/// How many attempts to make and how long to pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

// ── Sleeper ──────────────────────────────────────────────────────────

/// Waits between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ── RetryReport ──────────────────────────────────────────────────────

/// What happened across a whole retry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    pub attempts: u32,
    /// Outcome of the last attempt made.
    pub outcome: BookingOutcome,
    /// Every attempt's outcome, in order.
    pub history: Vec<BookingOutcome>,
}

impl RetryReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_success()
    }
}

// ── RetryController ──────────────────────────────────────────────────

pub struct RetryController<S = TokioSleeper> {
    policy: RetryPolicy,
    sleeper: S,
    notifier: Option<Arc<dyn Notifier>>,
}

impl RetryController<TokioSleeper> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, TokioSleeper)
    }
}

impl<S: Sleeper> RetryController<S> {
    pub fn with_sleeper(policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            policy,
            sleeper,
            notifier: None,
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Call `attempt` with the 1-based attempt number until it succeeds or
    /// the policy runs out. Pauses between failures, never after the last.
    pub async fn run<F, Fut>(&self, mut attempt: F) -> RetryReport
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = BookingOutcome>,
    {
        let max = self.policy.max_attempts;
        let mut history = Vec::new();
        let mut number = 1;

        let outcome = loop {
            info!(attempt = number, max, "booking attempt {number} of {max}");
            let outcome = attempt(number).await;
            history.push(outcome.clone());

            match &outcome {
                BookingOutcome::Success => {
                    info!(attempt = number, "booking successful");
                    break outcome;
                }
                BookingOutcome::Failure { reason } if number >= max => {
                    warn!(attempt = number, %reason, "all {max} booking attempts failed");
                    break outcome;
                }
                BookingOutcome::Failure { reason } => {
                    warn!(
                        attempt = number,
                        %reason,
                        "booking failed, retrying in {}s",
                        self.policy.delay.as_secs()
                    );
                    self.sleeper.sleep(self.policy.delay).await;
                    number += 1;
                }
            }
        };

        let report = RetryReport {
            attempts: number,
            outcome,
            history,
        };

        if let Some(notifier) = &self.notifier {
            notifier.booking_finished(&report);
        }

        report
    }
}

impl<S> std::fmt::Debug for RetryController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryController")
            .field("policy", &self.policy)
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}
