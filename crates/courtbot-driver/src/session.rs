// Session-scoped WebDriver commands
//
// One `Session` is one browser window. Element handles returned here are
// only valid for the session that produced them.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::client::WebDriverClient;
use crate::error::Error;
use crate::locator::{Locator, css_string, xpath_literal};

/// Opaque handle to an element inside a session, serialized under the
/// W3C web element identifier key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

impl ElementRef {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A live browser session on the WebDriver endpoint.
#[derive(Debug)]
pub struct Session {
    client: WebDriverClient,
    id: String,
}

impl Session {
    pub(crate) fn new(client: WebDriverClient, id: String) -> Self {
        Self { client, id }
    }

    /// The driver-assigned session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn path(&self, suffix: &str) -> String {
        format!("session/{}/{suffix}", self.id)
    }

    fn element_path(&self, element: &ElementRef, suffix: &str) -> String {
        format!("session/{}/element/{}/{suffix}", self.id, element.id)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Load `url` in the current window. Returns once the driver reports
    /// the navigation complete.
    pub async fn navigate(&self, url: &Url) -> Result<(), Error> {
        let _: Value = self
            .client
            .command(Method::POST, &self.path("url"), Some(&json!({ "url": url })))
            .await?;
        Ok(())
    }

    /// `document.readyState` of the current page.
    pub async fn ready_state(&self) -> Result<String, Error> {
        let state = self.execute("return document.readyState;", Vec::new()).await?;
        Ok(state.as_str().unwrap_or_default().to_owned())
    }

    /// Run a synchronous script in the page and return its result.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, Error> {
        self.client
            .command(
                Method::POST,
                &self.path("execute/sync"),
                Some(&json!({ "script": script, "args": args })),
            )
            .await
    }

    // ── Element lookup ───────────────────────────────────────────────

    /// Find the first element matching `locator`.
    pub async fn find_element(&self, locator: &Locator) -> Result<ElementRef, Error> {
        let body = json!(locator.selector());
        self.client
            .command(Method::POST, &self.path("element"), Some(&body))
            .await
            .map_err(|e| not_found(e, locator))
    }

    /// Find every element matching `locator`. An empty result is not an error.
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, Error> {
        let body = json!(locator.selector());
        self.client
            .command(Method::POST, &self.path("elements"), Some(&body))
            .await
    }

    /// Find the first descendant of `parent` matching `locator`.
    pub async fn find_child(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<ElementRef, Error> {
        let body = json!(locator.selector());
        self.client
            .command(
                Method::POST,
                &self.element_path(parent, "element"),
                Some(&body),
            )
            .await
            .map_err(|e| not_found(e, locator))
    }

    // ── Element interaction ──────────────────────────────────────────

    pub async fn clear(&self, element: &ElementRef) -> Result<(), Error> {
        let _: Value = self
            .client
            .command(Method::POST, &self.element_path(element, "clear"), Some(&json!({})))
            .await?;
        Ok(())
    }

    /// Type `text` into the element.
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), Error> {
        let _: Value = self
            .client
            .command(
                Method::POST,
                &self.element_path(element, "value"),
                Some(&json!({ "text": text })),
            )
            .await?;
        Ok(())
    }

    pub async fn click(&self, element: &ElementRef) -> Result<(), Error> {
        let _: Value = self
            .client
            .command(Method::POST, &self.element_path(element, "click"), Some(&json!({})))
            .await?;
        Ok(())
    }

    /// Pick an `<option>` of the `select` element: by `value` attribute
    /// first, then by visible label.
    pub async fn select_option(&self, select: &Locator, value: &str) -> Result<(), Error> {
        let list = self.find_element(select).await?;

        let by_value = Locator::css(format!("option[value={}]", css_string(value)));
        let option = match self.find_child(&list, &by_value).await {
            Ok(option) => option,
            Err(e) if e.is_no_such_element() => {
                let by_label = Locator::xpath(format!(
                    "./option[normalize-space(.)={}]",
                    xpath_literal(value)
                ));
                self.find_child(&list, &by_label).await.map_err(|e| {
                    if e.is_no_such_element() {
                        Error::NoSuchOption {
                            select: select.to_string(),
                            value: value.to_owned(),
                        }
                    } else {
                        e
                    }
                })?
            }
            Err(e) => return Err(e),
        };

        self.click(&option).await
    }

    pub async fn is_displayed(&self, element: &ElementRef) -> Result<bool, Error> {
        self.client
            .command(Method::GET, &self.element_path(element, "displayed"), None)
            .await
    }

    // ── Capture / teardown ───────────────────────────────────────────

    /// Capture the viewport as PNG bytes.
    pub async fn screenshot(&self) -> Result<Vec<u8>, Error> {
        let encoded: String = self
            .client
            .command(Method::GET, &self.path("screenshot"), None)
            .await?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| Error::Screenshot(e.to_string()))
    }

    /// End the session and close the browser.
    pub async fn delete(self) -> Result<(), Error> {
        let _: Value = self
            .client
            .command(Method::DELETE, &format!("session/{}", self.id), None)
            .await?;
        debug!(session = %self.id, "browser session closed");
        Ok(())
    }
}

fn not_found(err: Error, locator: &Locator) -> Error {
    if err.is_no_such_element() {
        Error::NoSuchElement {
            locator: locator.to_string(),
        }
    } else {
        err
    }
}
