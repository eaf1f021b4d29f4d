use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the portal browser session and its scrapers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal login page URL
    pub login_url: String,

    /// Portal application directory URL
    pub directory_url: String,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Per-action browser timeout in seconds (default: 60, educational
    /// sites are slow)
    pub action_timeout_secs: u64,

    /// Settle time after navigating to the login page in milliseconds
    pub settle_ms: u64,

    /// Upper bound for locating a login form field in milliseconds
    pub field_timeout_ms: u64,

    /// Upper bound for confirming the login outcome in milliseconds
    pub outcome_timeout_ms: u64,

    /// Settle time after the directory page loads in milliseconds
    pub directory_settle_ms: u64,

    /// Settle time after launching an application in milliseconds
    pub launch_settle_ms: u64,

    /// Settle time for a platform app to finish loading in milliseconds
    pub app_settle_ms: u64,

    /// Settle time before mining records from a platform page
    pub records_settle_ms: u64,

    /// Poll interval for bounded readiness checks in milliseconds
    pub poll_interval_ms: u64,

    /// Selector candidates for the username field, in priority order
    pub username_selectors: Vec<String>,

    /// Selector candidates for the password field, in priority order
    pub password_selectors: Vec<String>,

    /// Selector candidates for the submit control, in priority order
    pub submit_selectors: Vec<String>,

    /// Selectors probed for login error messages
    pub error_selectors: Vec<String>,

    /// URL substrings that positively confirm a logged-in portal page
    pub success_markers: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: "https://clever.com/in/edu-login".to_string(),
            directory_url: "https://clever.com/applications".to_string(),
            headless: true,
            action_timeout_secs: 60,
            settle_ms: 3000,
            field_timeout_ms: 10_000,
            outcome_timeout_ms: 8000,
            directory_settle_ms: 5000,
            launch_settle_ms: 8000,
            app_settle_ms: 10_000,
            records_settle_ms: 5000,
            poll_interval_ms: 250,
            username_selectors: vec![
                "input[name=\"username\"]".to_string(),
                "input[type=\"text\"]".to_string(),
                "input[placeholder*=\"username\" i]".to_string(),
                "input[placeholder*=\"email\" i]".to_string(),
                "#username".to_string(),
                ".username-input".to_string(),
            ],
            password_selectors: vec![
                "input[name=\"password\"]".to_string(),
                "input[type=\"password\"]".to_string(),
                "input[placeholder*=\"password\" i]".to_string(),
                "#password".to_string(),
                ".password-input".to_string(),
            ],
            submit_selectors: vec![
                "button[type=\"submit\"]".to_string(),
                "input[type=\"submit\"]".to_string(),
                ".login-button".to_string(),
            ],
            error_selectors: vec![
                ".error".to_string(),
                ".alert-error".to_string(),
                "[class*=\"error\"]".to_string(),
            ],
            success_markers: vec![
                "portal".to_string(),
                "dashboard".to_string(),
                "clever.com".to_string(),
            ],
        }
    }
}

impl PortalConfig {
    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.action_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn field_timeout(&self) -> Duration {
        Duration::from_millis(self.field_timeout_ms)
    }

    pub fn outcome_timeout(&self) -> Duration {
        Duration::from_millis(self.outcome_timeout_ms)
    }

    pub fn directory_settle(&self) -> Duration {
        Duration::from_millis(self.directory_settle_ms)
    }

    pub fn launch_settle(&self) -> Duration {
        Duration::from_millis(self.launch_settle_ms)
    }

    pub fn app_settle(&self) -> Duration {
        Duration::from_millis(self.app_settle_ms)
    }

    pub fn records_settle(&self) -> Duration {
        Duration::from_millis(self.records_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Portal login credentials, read from the environment only.
///
/// Credential storage is out of scope; `PORTAL_USERNAME` and
/// `PORTAL_PASSWORD` are the single source.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("PORTAL_USERNAME").unwrap_or_default(),
            password: std::env::var("PORTAL_PASSWORD").unwrap_or_default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = PortalConfig::default();
        assert!(config.headless);
        assert_eq!(config.action_timeout_secs, 60);
        assert_eq!(config.settle_ms, 3000);
        assert_eq!(config.outcome_timeout_ms, 8000);
        assert!(!config.username_selectors.is_empty());
        assert!(!config.password_selectors.is_empty());
        assert!(!config.success_markers.is_empty());
    }

    #[test]
    fn test_durations() {
        let config = PortalConfig::default();
        assert_eq!(config.action_timeout(), Duration::from_secs(60));
        assert_eq!(config.settle(), Duration::from_millis(3000));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_empty_credentials_incomplete() {
        let creds = Credentials::default();
        assert!(!creds.is_complete());

        let creds = Credentials {
            username: "student".into(),
            password: "hunter2".into(),
        };
        assert!(creds.is_complete());
    }
}
