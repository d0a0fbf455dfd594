//! Async client for the W3C WebDriver protocol.
//!
//! Just enough of the protocol to drive a reservation form from a headless
//! Chrome: create a session, navigate, locate elements by CSS or visible
//! text, type, click, query visibility, run a script, capture a PNG and
//! tear the session down.
//!
//! - **[`WebDriverClient`]** -- HTTP transport and `{"value": ...}` envelope handling.
//! - **[`Session`]** -- one browser window; all element commands hang off it.
//! - **[`Locator`]** -- CSS or text locators lowered to WebDriver strategies.

pub mod capabilities;
pub mod client;
pub mod error;
pub mod locator;
pub mod session;
pub mod transport;

pub use capabilities::{Capabilities, DESKTOP_USER_AGENT};
pub use client::WebDriverClient;
pub use error::Error;
pub use locator::{Locator, Selector};
pub use session::{ElementRef, Session};
pub use transport::TransportConfig;
