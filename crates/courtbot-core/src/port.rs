// ── Automation port ──
//
// The surface the orchestrator drives. Everything the booking sequence
// does to the remote UI goes through these methods, so any driver (or a
// scripted fake) that implements them can stand in for a real browser.

use std::future::Future;
use std::path::Path;

use url::Url;

pub use courtbot_driver::Locator;

use crate::error::CoreError;

/// One live automation session.
///
/// `close` takes `self`: a port can be released once and is unusable
/// afterwards.
pub trait AutomationPort: Send {
    /// Load `url` in the session's page.
    fn open(&mut self, url: &Url) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Wait until the page reports that loading has finished.
    fn wait_until_idle(&mut self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Replace the contents of the field at `locator` with `value`.
    fn fill_field(
        &mut self,
        locator: &Locator,
        value: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn click(&mut self, locator: &Locator) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Choose `value` in the dropdown at `locator`.
    fn select_option(
        &mut self,
        locator: &Locator,
        value: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Whether any element matching `locator` is currently displayed.
    fn is_visible(
        &mut self,
        locator: &Locator,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn wait_millis(&mut self, millis: u64) -> impl Future<Output = ()> + Send;

    /// Write a PNG of the current page to `path`.
    fn capture_screenshot(
        &mut self,
        path: &Path,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Release the session.
    fn close(self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Opens a fresh [`AutomationPort`] for each attempt.
pub trait SessionLauncher: Send + Sync {
    type Port: AutomationPort;

    fn launch(&self) -> impl Future<Output = Result<Self::Port, CoreError>> + Send;
}
