// Shared fixtures for the orchestrator and retry tests: a scripted
// in-memory automation port that records every call made to it.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use courtbot_core::{
    AutomationPort, BookingConfig, BookingConfigBuilder, Clock, CoreError, Locator, SessionLauncher,
    SettleTimings, site,
};
use secrecy::SecretString;
use url::Url;

pub const USERNAME: &str = "alice@example.com";
pub const PASSWORD: &str = "s3cret-pass";

// ── Recorded calls ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(String),
    WaitIdle,
    Fill(String, String),
    Click(String),
    Select(String, String),
    IsVisible(String),
    Wait(u64),
    Screenshot(PathBuf),
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Call>>>);

impl Recorder {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn closes(&self) -> usize {
        self.count(|c| *c == Call::Close)
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Screenshot(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn selections(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Select(l, v) => Some((l, v)),
                _ => None,
            })
            .collect()
    }

    pub fn waits(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Wait(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }
}

// ── Script ───────────────────────────────────────────────────────────

/// How the fake site behaves during one session.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Locators (by display form) that error when clicked, filled or selected.
    pub failing: HashMap<String, String>,
    /// Error returned by `open`.
    pub open_error: Option<String>,
    /// Locators that become visible after this many negative checks.
    pub visible_after: HashMap<String, usize>,
    pub screenshot_error: bool,
    pub close_error: bool,
}

impl Script {
    /// Every page element shows up immediately and the booking confirms.
    pub fn happy() -> Self {
        let mut script = Self::default();
        script.show(&site::username_field(), 0);
        script.show(&site::club_result(courtbot_core::config::defaults::CLUB_SELECTOR), 0);
        script.show(&site::confirmation_marker(), 0);
        script
    }

    /// The form submits but no confirmation ever appears.
    pub fn slot_taken() -> Self {
        let mut script = Self::happy();
        script.hide(&site::confirmation_marker());
        script
    }

    pub fn show(&mut self, locator: &Locator, after_checks: usize) -> &mut Self {
        self.visible_after.insert(locator.to_string(), after_checks);
        self
    }

    pub fn hide(&mut self, locator: &Locator) -> &mut Self {
        self.visible_after.remove(&locator.to_string());
        self
    }

    pub fn fail(&mut self, locator: &Locator, message: &str) -> &mut Self {
        self.failing.insert(locator.to_string(), message.to_owned());
        self
    }
}

// ── ScriptedPort ─────────────────────────────────────────────────────

pub struct ScriptedPort {
    script: Script,
    log: Recorder,
    checks: HashMap<String, usize>,
}

impl ScriptedPort {
    pub fn new(script: Script, log: Recorder) -> Self {
        Self {
            script,
            log,
            checks: HashMap::new(),
        }
    }

    fn interact(&self, locator: &Locator) -> Result<(), CoreError> {
        match self.script.failing.get(&locator.to_string()) {
            Some(message) => Err(CoreError::ElementNotFound {
                locator: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl AutomationPort for ScriptedPort {
    async fn open(&mut self, url: &Url) -> Result<(), CoreError> {
        self.log.push(Call::Open(url.to_string()));
        match &self.script.open_error {
            Some(reason) => Err(CoreError::ConnectionFailed {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn wait_until_idle(&mut self) -> Result<(), CoreError> {
        self.log.push(Call::WaitIdle);
        Ok(())
    }

    async fn fill_field(&mut self, locator: &Locator, value: &str) -> Result<(), CoreError> {
        self.log.push(Call::Fill(locator.to_string(), value.to_owned()));
        self.interact(locator)
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), CoreError> {
        self.log.push(Call::Click(locator.to_string()));
        self.interact(locator)
    }

    async fn select_option(&mut self, locator: &Locator, value: &str) -> Result<(), CoreError> {
        self.log.push(Call::Select(locator.to_string(), value.to_owned()));
        self.interact(locator)
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool, CoreError> {
        let key = locator.to_string();
        self.log.push(Call::IsVisible(key.clone()));
        let seen = self.checks.entry(key.clone()).or_insert(0);
        let visible = self
            .script
            .visible_after
            .get(&key)
            .is_some_and(|after| *seen >= *after);
        *seen += 1;
        Ok(visible)
    }

    async fn wait_millis(&mut self, millis: u64) {
        self.log.push(Call::Wait(millis));
    }

    async fn capture_screenshot(&mut self, path: &Path) -> Result<(), CoreError> {
        self.log.push(Call::Screenshot(path.to_path_buf()));
        if self.script.screenshot_error {
            Err(CoreError::Screenshot {
                path: path.display().to_string(),
                reason: "disk full".into(),
            })
        } else {
            Ok(())
        }
    }

    async fn close(self) -> Result<(), CoreError> {
        self.log.push(Call::Close);
        if self.script.close_error {
            Err(CoreError::Driver {
                message: "session already gone".into(),
            })
        } else {
            Ok(())
        }
    }
}

// ── ScriptedLauncher ─────────────────────────────────────────────────

/// Hands out one scripted port per launch. Scripts are consumed in order;
/// the last one repeats once the queue is down to a single entry.
#[derive(Clone)]
pub struct ScriptedLauncher {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    pub log: Recorder,
    launches: Arc<Mutex<u32>>,
    launch_error: Option<String>,
}

impl ScriptedLauncher {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into_iter().collect())),
            log: Recorder::default(),
            launches: Arc::new(Mutex::new(0)),
            launch_error: None,
        }
    }

    pub fn unreachable(reason: &str) -> Self {
        let mut launcher = Self::new(Vec::new());
        launcher.launch_error = Some(reason.to_owned());
        launcher
    }

    pub fn launches(&self) -> u32 {
        *self.launches.lock().unwrap()
    }
}

impl SessionLauncher for ScriptedLauncher {
    type Port = ScriptedPort;

    async fn launch(&self) -> Result<ScriptedPort, CoreError> {
        *self.launches.lock().unwrap() += 1;
        if let Some(reason) = &self.launch_error {
            return Err(CoreError::LaunchFailed {
                url: "http://localhost:4444/".into(),
                reason: reason.clone(),
            });
        }
        let script = {
            let mut scripts = self.scripts.lock().unwrap();
            if scripts.len() > 1 {
                scripts.pop_front().unwrap_or_default()
            } else {
                scripts.front().cloned().unwrap_or_default()
            }
        };
        Ok(ScriptedPort::new(script, self.log.clone()))
    }
}

// ── Clock & config ───────────────────────────────────────────────────

/// A clock the test can move.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<Mutex<NaiveDateTime>>);

impl ManualClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .unwrap()
}

pub fn builder() -> BookingConfigBuilder {
    BookingConfig::builder()
        .username(USERNAME)
        .password(SecretString::from(PASSWORD.to_string()))
        .settle(SettleTimings::immediate())
        .element_timeout(Duration::ZERO)
}

pub fn config() -> Arc<BookingConfig> {
    Arc::new(builder().build().unwrap())
}
