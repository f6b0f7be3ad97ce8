//! Device metadata captured at session creation
//!
//! User-agent parsing is inherently best-effort and lossy, so it is kept
//! behind a pure function that session logic never depends on: an
//! unrecognized user agent simply yields no platform/browser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLATFORM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Windows|Mac|Linux|Android|iOS)").unwrap());

static BROWSER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Chrome|Firefox|Safari|Edge|Opera)").unwrap());

/// Coarse device metadata attached to a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Raw user-agent string as presented by the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Client IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Platform extracted from the user agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Browser extracted from the user agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
}

impl DeviceInfo {
    /// Build device info from request parts, parsing the user agent
    pub fn from_parts(user_agent: Option<String>, ip: Option<String>) -> Self {
        let (platform, browser) = match user_agent.as_deref() {
            Some(ua) => parse_user_agent(ua),
            None => (None, None),
        };

        Self {
            user_agent,
            ip,
            platform,
            browser,
        }
    }
}

/// Extract platform and browser names from a free-text user-agent string
pub fn parse_user_agent(user_agent: &str) -> (Option<String>, Option<String>) {
    let platform = PLATFORM_REGEX
        .captures(user_agent)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let browser = BROWSER_REGEX
        .captures(user_agent)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    (platform, browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_agent_chrome_on_windows() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/119.0.0.0";
        let (platform, browser) = parse_user_agent(ua);
        assert_eq!(platform.as_deref(), Some("Windows"));
        assert_eq!(browser.as_deref(), Some("Chrome"));
    }

    #[test]
    fn test_parse_user_agent_unknown() {
        let (platform, browser) = parse_user_agent("curl/8.0.1");
        assert!(platform.is_none());
        assert!(browser.is_none());
    }

    #[test]
    fn test_from_parts_without_user_agent() {
        let info = DeviceInfo::from_parts(None, Some("192.168.1.1".to_string()));
        assert!(info.platform.is_none());
        assert_eq!(info.ip.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn test_from_parts_fills_parsed_fields() {
        let info = DeviceInfo::from_parts(
            Some("Mozilla/5.0 (Linux; Android 13) Firefox/121.0".to_string()),
            None,
        );
        assert_eq!(info.platform.as_deref(), Some("Linux"));
        assert_eq!(info.browser.as_deref(), Some("Firefox"));
    }
}
