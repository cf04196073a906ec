//! Configuration management for the review client
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (AI_REVIEW_*)
//! 3. Config file (~/.config/ai-review/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Delay between a successful submission and navigating to its review
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Review service connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the review service
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Front-end behaviour settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the submission confirmation stays up before navigating
    #[serde(with = "humantime_serde")]
    pub redirect_delay: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Review service configuration
    pub api: ApiConfig,

    /// Front-end configuration
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/ai-review/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ai-review").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - AI_REVIEW_API_URL: Base URL of the review service
    /// - AI_REVIEW_REDIRECT_DELAY: Post-submit delay, e.g. "1500ms" or "2s"
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("AI_REVIEW_API_URL") {
            self.api.base_url = url;
        }

        if let Some(raw) = lookup("AI_REVIEW_REDIRECT_DELAY") {
            match humantime::parse_duration(&raw) {
                Ok(delay) => self.ui.redirect_delay = delay,
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring invalid AI_REVIEW_REDIRECT_DELAY")
                }
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api.base_url = url;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(api_url: Option<String>) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides().with_cli_overrides(api_url))
    }

    /// The configured base URL, parsed
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api.base_url).map_err(|e| {
            Error::Config(format!("Invalid API URL '{}': {}", self.api.base_url, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.ui.redirect_delay, Duration::from_millis(1500));
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(Some("https://review.example.com".to_string()));
        assert_eq!(config.api.base_url, "https://review.example.com");

        let config = Config::default().with_cli_overrides(None);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AI_REVIEW_API_URL", "http://review:9000"),
            ("AI_REVIEW_REDIRECT_DELAY", "2s"),
        ]
        .into_iter()
        .collect();

        let config =
            Config::default().with_overrides_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "http://review:9000");
        assert_eq!(config.ui.redirect_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_env_delay_is_ignored() {
        let config = Config::default().with_overrides_from(|k| {
            (k == "AI_REVIEW_REDIRECT_DELAY").then(|| "soon".to_string())
        });
        assert_eq!(config.ui.redirect_delay, DEFAULT_REDIRECT_DELAY);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[api]
base_url = "https://review.internal:8443/api"

[ui]
redirect_delay = "250ms"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://review.internal:8443/api");
        assert_eq!(config.ui.redirect_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[ui]
redirect_delay = "1s"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // base_url should use default
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ui.redirect_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://127.0.0.1:8001\"").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8001");
    }

    #[test]
    fn test_load_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config::default().with_cli_overrides(Some("not a url".to_string()));
        assert!(matches!(config.base_url(), Err(Error::Config(_))));
    }
}
