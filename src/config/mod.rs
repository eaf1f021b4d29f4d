//! Configuration management for studypilot.
//!
//! Configuration is read from `~/.config/studypilot/config.toml` at
//! startup. If the file doesn't exist, a default configuration with
//! comments is created. Credentials never live here; they come from the
//! environment (`PORTAL_USERNAME`, `PORTAL_PASSWORD`, `OPENAI_API_KEY`).

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::advisor::AdvisorConfig;
use crate::portal::PortalConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub advisor: AdvisorConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with
    /// comments. Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/studypilot/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("studypilot").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# studypilot configuration
#
# Credentials are read from the environment, not from this file:
#   PORTAL_USERNAME / PORTAL_PASSWORD  - portal login
#   OPENAI_API_KEY                     - study guidance (optional)

[portal]
# Portal login and application directory URLs
login_url = "https://clever.com/in/edu-login"
directory_url = "https://clever.com/applications"

# Run the browser without a visible window
headless = true

# Per-action browser timeout in seconds (educational sites are slow)
action_timeout_secs = 60

# Settle/polling intervals in milliseconds
settle_ms = 3000
field_timeout_ms = 10000
outcome_timeout_ms = 8000
directory_settle_ms = 5000
launch_settle_ms = 8000
app_settle_ms = 10000
records_settle_ms = 5000
poll_interval_ms = 250

# Selector candidates for the login form, in priority order
username_selectors = [
    'input[name="username"]',
    'input[type="text"]',
    'input[placeholder*="username" i]',
    'input[placeholder*="email" i]',
    '#username',
    '.username-input',
]
password_selectors = [
    'input[name="password"]',
    'input[type="password"]',
    'input[placeholder*="password" i]',
    '#password',
    '.password-input',
]
submit_selectors = [
    'button[type="submit"]',
    'input[type="submit"]',
    '.login-button',
]

# Selectors probed for login error messages
error_selectors = ['.error', '.alert-error', '[class*="error"]']

# URL substrings that positively confirm a logged-in portal page
success_markers = ["portal", "dashboard", "clever.com"]

[advisor]
# Chat-completions endpoint and model for study guidance
endpoint = "https://api.openai.com/v1/chat/completions"
model = "gpt-3.5-turbo"
temperature = 0.7
max_tokens = 1500
timeout_secs = 30
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert!(config.portal.headless);
        assert_eq!(config.portal.action_timeout_secs, 60);
        assert_eq!(config.advisor.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[portal]
headless = false
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom value
        assert!(!config.portal.headless);
        // Default values
        assert_eq!(config.portal.settle_ms, 3000);
        assert_eq!(config.advisor.max_tokens, 1500);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert!(config.portal.headless);
        assert!(!config.portal.username_selectors.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[advisor]\nmodel = \"gpt-4o\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.advisor.model, "gpt-4o");
        assert!(config.portal.headless);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "portal = 3").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
