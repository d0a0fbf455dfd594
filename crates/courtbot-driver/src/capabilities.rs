use serde_json::{Value, json};

/// Desktop Chrome user agent presented to the reservation site.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Browser capabilities requested when a session is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub headless: bool,
    pub user_agent: Option<String>,
    /// Window size in CSS pixels (width, height).
    pub window: (u32, u32),
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: Some(DESKTOP_USER_AGENT.into()),
            window: (1920, 1080),
        }
    }
}

impl Capabilities {
    /// The `New Session` request body.
    pub fn to_request(&self) -> Value {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless=new".to_owned());
        }
        args.push(format!("--window-size={},{}", self.window.0, self.window.1));
        if let Some(ref ua) = self.user_agent {
            args.push(format!("--user-agent={ua}"));
        }

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_headless_full_hd() {
        let body = Capabilities::default().to_request();
        let args = &body["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"];
        assert_eq!(args[0], "--headless=new");
        assert_eq!(args[1], "--window-size=1920,1080");
        assert!(args[2].as_str().is_some_and(|a| a.contains("Chrome/121")));
        assert_eq!(body["capabilities"]["alwaysMatch"]["browserName"], "chrome");
    }

    #[test]
    fn headed_session_omits_headless_flag() {
        let caps = Capabilities {
            headless: false,
            user_agent: None,
            window: (1280, 720),
        };
        let body = caps.to_request();
        let args = body["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        assert_eq!(args, vec![serde_json::json!("--window-size=1280,720")]);
    }
}
