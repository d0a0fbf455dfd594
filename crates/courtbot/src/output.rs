//! Terminal output: colored status markers, the config summary, and the
//! console notifier that prints the final booking banner.

use std::io::{self, IsTerminal};

use courtbot_core::{BookingConfig, Notifier, RetryReport};
use owo_colors::OwoColorize;

use crate::cli::ColorMode;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            color: should_color(mode),
        }
    }

    pub fn ok(self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn bad(self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn note(self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn bold(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_owned()
        }
    }
}

pub fn rule() -> String {
    "=".repeat(60)
}

/// The masked configuration block printed before a run.
pub fn config_summary(config: &BookingConfig, painter: Painter) -> String {
    format!("{}\n{config}", painter.bold("Booking configuration"))
}

// ── ConsoleNotifier ──────────────────────────────────────────────────

/// Prints the final result of a retry run to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    painter: Painter,
}

impl ConsoleNotifier {
    pub fn new(painter: Painter) -> Self {
        Self { painter }
    }

    pub fn banner(&self, report: &RetryReport) -> String {
        let noun = if report.attempts == 1 { "attempt" } else { "attempts" };
        match report.outcome.reason() {
            None => format!(
                "{} Booking completed successfully after {} {noun}",
                self.painter.ok("✓"),
                report.attempts
            ),
            Some(reason) => format!(
                "{} All {} {noun} failed. Last error: {reason}",
                self.painter.bad("✗"),
                report.attempts
            ),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn booking_finished(&self, report: &RetryReport) {
        println!("\n{}\n{}\n{}", rule(), self.banner(report), rule());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtbot_core::BookingOutcome;

    fn plain() -> ConsoleNotifier {
        ConsoleNotifier::new(Painter::new(ColorMode::Never))
    }

    #[test]
    fn success_banner_counts_attempts() {
        let report = RetryReport {
            attempts: 2,
            outcome: BookingOutcome::Success,
            history: vec![BookingOutcome::slot_taken(), BookingOutcome::Success],
        };
        assert_eq!(
            plain().banner(&report),
            "✓ Booking completed successfully after 2 attempts"
        );
    }

    #[test]
    fn failure_banner_carries_last_reason() {
        let report = RetryReport {
            attempts: 1,
            outcome: BookingOutcome::slot_taken(),
            history: vec![BookingOutcome::slot_taken()],
        };
        assert_eq!(
            plain().banner(&report),
            "✗ All 1 attempt failed. Last error: Booking failed - slot may be taken"
        );
    }
}
