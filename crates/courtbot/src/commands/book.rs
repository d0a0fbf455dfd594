//! `courtbot book` -- the scheduled entry point.

use std::sync::Arc;

use courtbot_core::{
    BookingOrchestrator, DateResolver, ElementWait, RetryController, WebDriverLauncher,
};
use courtbot_driver::{Capabilities, TransportConfig, WebDriverClient};
use tracing::debug;

use crate::cli::{BookArgs, GlobalOpts};
use crate::commands::load_settings;
use crate::error::CliError;
use crate::output::{self, ConsoleNotifier, Painter};

/// Load and validate the configuration, then run the retry loop.
///
/// The booking outcome does not affect the exit status; only problems that
/// stop the run from starting (bad configuration, bad endpoint URL) do.
pub async fn handle(args: BookArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut settings = load_settings(global)?;
    if let Some(retries) = args.max_retries {
        settings.max_retries = retries;
    }
    if let Some(delay) = args.retry_delay {
        settings.retry_delay = delay;
    }
    if args.headed {
        settings.headless = false;
    }

    let config = Arc::new(settings.to_booking_config()?);
    let webdriver_url = settings.webdriver_url()?;

    let painter = Painter::new(global.color);
    println!("{}\n", output::config_summary(&config, painter));
    debug!(webdriver = %webdriver_url, headless = settings.headless, "launching sessions");

    let client = WebDriverClient::new(webdriver_url, &TransportConfig::default())?;
    let capabilities = Capabilities {
        headless: settings.headless,
        ..Capabilities::default()
    };
    let launcher = WebDriverLauncher::new(client, capabilities)
        .with_page_timeout(config.element_timeout())
        .with_element_wait(ElementWait {
            timeout: config.element_timeout(),
            poll_interval: config.settle().poll_interval,
        });

    let orchestrator = BookingOrchestrator::new(Arc::clone(&config), DateResolver::system());
    let retry = RetryController::new(config.retry_policy())
        .with_notifier(Arc::new(ConsoleNotifier::new(painter)));

    let report = retry.run(|_| orchestrator.attempt_with(&launcher)).await;
    debug!(attempts = report.attempts, success = report.succeeded(), "booking run finished");
    Ok(())
}
