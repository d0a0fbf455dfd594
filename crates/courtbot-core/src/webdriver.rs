// ── WebDriver-backed automation port ──
//
// Adapts a `courtbot_driver::Session` to `AutomationPort`. One launcher
// is built per run; every attempt gets its own browser session from it.
//
// The site re-renders whole sections after most clicks, so element
// interactions keep retrying while the target is missing, detached or not
// yet interactable, up to the element timeout. Only displayed elements are
// acted on.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use courtbot_driver::{
    Capabilities, ElementRef, Error as DriverError, Locator, Session, WebDriverClient,
};
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

use crate::config::defaults;
use crate::error::CoreError;
use crate::port::{AutomationPort, SessionLauncher};

const READY_POLL: Duration = Duration::from_millis(100);

/// How long element interactions wait, and how often they look again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ElementWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::ELEMENT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
        }
    }
}

/// Starts browser sessions on a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    client: WebDriverClient,
    capabilities: Capabilities,
    page_timeout: Duration,
    element_wait: ElementWait,
}

impl WebDriverLauncher {
    pub fn new(client: WebDriverClient, capabilities: Capabilities) -> Self {
        Self {
            client,
            capabilities,
            page_timeout: Duration::from_secs(defaults::ELEMENT_TIMEOUT_SECS),
            element_wait: ElementWait::default(),
        }
    }

    /// Upper bound for [`AutomationPort::wait_until_idle`].
    #[must_use]
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_element_wait(mut self, wait: ElementWait) -> Self {
        self.element_wait = wait;
        self
    }
}

impl SessionLauncher for WebDriverLauncher {
    type Port = WebDriverPort;

    async fn launch(&self) -> Result<WebDriverPort, CoreError> {
        let session = self
            .client
            .new_session(&self.capabilities)
            .await
            .map_err(|e| CoreError::LaunchFailed {
                url: self.client.base_url().to_string(),
                reason: e.to_string(),
            })?;
        debug!(session = session.id(), "browser session started");
        Ok(WebDriverPort {
            session,
            page_timeout: self.page_timeout,
            element_wait: self.element_wait,
        })
    }
}

/// A live browser session seen through the automation port.
#[derive(Debug)]
pub struct WebDriverPort {
    session: Session,
    page_timeout: Duration,
    element_wait: ElementWait,
}

impl WebDriverPort {
    pub fn new(session: Session, page_timeout: Duration, element_wait: ElementWait) -> Self {
        Self {
            session,
            page_timeout,
            element_wait,
        }
    }

    /// Run `op` until it stops failing on a pending element or the element
    /// timeout runs out.
    async fn with_element<T, F, Fut>(&self, locator: &Locator, mut op: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DriverError>>,
    {
        let ElementWait {
            timeout,
            poll_interval,
        } = self.element_wait;
        let deadline = Instant::now() + timeout;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_pending_element() => {
                    if Instant::now() >= deadline {
                        debug!(%locator, error = %e, "gave up waiting for element");
                        // A list that loaded without the wanted entry says more
                        // than a bare timeout.
                        if matches!(e, DriverError::NoSuchOption { .. }) {
                            return Err(e.into());
                        }
                        return Err(DriverError::Timeout {
                            what: locator.to_string(),
                            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        }
                        .into());
                    }
                    trace!(%locator, error = %e, "element not ready");
                    tokio::time::sleep(poll_interval).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// The first element matching `locator` that is displayed right now.
///
/// Elements that detach while being checked count as not displayed.
async fn first_displayed(
    session: &Session,
    locator: &Locator,
) -> Result<Option<ElementRef>, DriverError> {
    for element in session.find_elements(locator).await? {
        match session.is_displayed(&element).await {
            Ok(true) => return Ok(Some(element)),
            Ok(false) => {}
            Err(e) if e.is_pending_element() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

async fn displayed_element(
    session: &Session,
    locator: &Locator,
) -> Result<ElementRef, DriverError> {
    first_displayed(session, locator)
        .await?
        .ok_or_else(|| DriverError::NoSuchElement {
            locator: locator.to_string(),
        })
}

impl AutomationPort for WebDriverPort {
    async fn open(&mut self, url: &Url) -> Result<(), CoreError> {
        self.session.navigate(url).await?;
        Ok(())
    }

    async fn wait_until_idle(&mut self) -> Result<(), CoreError> {
        let deadline = Instant::now() + self.page_timeout;
        loop {
            if self.session.ready_state().await? == "complete" {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(CoreError::Timeout {
                    what: "page load".into(),
                    timeout_ms: u64::try_from(self.page_timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(READY_POLL).await;
        }
    }

    async fn fill_field(&mut self, locator: &Locator, value: &str) -> Result<(), CoreError> {
        let session = &self.session;
        self.with_element(locator, move || async move {
            let field = displayed_element(session, locator).await?;
            session.clear(&field).await?;
            session.send_keys(&field, value).await
        })
        .await
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), CoreError> {
        let session = &self.session;
        self.with_element(locator, move || async move {
            let element = displayed_element(session, locator).await?;
            session.click(&element).await
        })
        .await
    }

    async fn select_option(&mut self, locator: &Locator, value: &str) -> Result<(), CoreError> {
        let session = &self.session;
        self.with_element(locator, move || session.select_option(locator, value))
            .await
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool, CoreError> {
        Ok(first_displayed(&self.session, locator).await?.is_some())
    }

    async fn wait_millis(&mut self, millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    async fn capture_screenshot(&mut self, path: &Path) -> Result<(), CoreError> {
        let failed = |reason: String| CoreError::Screenshot {
            path: path.display().to_string(),
            reason,
        };

        let png = self
            .session
            .screenshot()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| failed(e.to_string()))?;
        }
        tokio::fs::write(path, png)
            .await
            .map_err(|e| failed(e.to_string()))
    }

    async fn close(self) -> Result<(), CoreError> {
        self.session.delete().await?;
        Ok(())
    }
}
