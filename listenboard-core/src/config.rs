use crate::error::{ConfigError, CoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "LISTENBOARD_CONFIG";
pub const API_URL_ENV: &str = "LISTENBOARD_API_URL";
pub const DEFAULT_CONFIG_FILE: &str = "listenboard.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_task_label")]
    pub task_label: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_page_buttons")]
    pub page_buttons: usize,
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_task_label() -> String {
    "data_analysis".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    7
}

fn default_page_buttons() -> usize {
    5
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            task_label: default_task_label(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_buttons: default_page_buttons(),
            seed_path: None,
        }
    }
}

impl ChatConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the chat endpoint, tolerating a trailing slash on the base.
    pub fn chat_endpoint(&self) -> String {
        format!("{}/ai/chat", self.base_url.trim_end_matches('/'))
    }
}

impl AppConfig {
    /// Resolves the config file (explicit path, then `LISTENBOARD_CONFIG`, then
    /// `listenboard.toml`), applies the API URL override and validates the result.
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(Some(url));
        }

        config.validate()?;
        info!(
            "Configuration loaded: chat endpoint {}, page size {}",
            config.chat.chat_endpoint(),
            config.dashboard.page_size
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    pub fn apply_api_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            debug!("Chat base URL overridden from environment: {}", url);
            self.chat.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.page_size".to_string(),
                value: "0".to_string(),
            });
        }
        if self.dashboard.page_buttons == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.page_buttons".to_string(),
                value: "0".to_string(),
            });
        }
        if self.chat.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chat.request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.chat.task_label.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "chat.task_label must not be empty".to_string(),
            });
        }

        let parsed = url::Url::parse(&self.chat.base_url).map_err(|e| {
            ConfigError::InvalidValue {
                field: "chat.base_url".to_string(),
                value: format!("{} ({})", self.chat.base_url, e),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "chat.base_url".to_string(),
                value: self.chat.base_url.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.chat.base_url, "http://localhost:3001");
        assert_eq!(config.chat.task_label, "data_analysis");
        assert_eq!(config.chat.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.dashboard.page_size, 7);
        assert_eq!(config.dashboard.page_buttons, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [chat]
            base_url = "https://insights.example.com/"

            [dashboard]
            page_size = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.chat.base_url, "https://insights.example.com/");
        assert_eq!(
            config.chat.chat_endpoint(),
            "https://insights.example.com/ai/chat"
        );
        assert_eq!(config.chat.task_label, "data_analysis");
        assert_eq!(config.dashboard.page_size, 10);
        assert_eq!(config.dashboard.page_buttons, 5);
    }

    #[test]
    fn test_malformed_toml() {
        let result = AppConfig::from_toml_str("[chat\nbase_url = ");
        assert!(matches!(result, Err(CoreError::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.dashboard.page_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = AppConfig::default();
        config.chat.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.chat.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.chat.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_url_override() {
        let mut config = AppConfig::default();
        config.apply_api_url_override(Some("  ".to_string()));
        assert_eq!(config.chat.base_url, "http://localhost:3001");

        config.apply_api_url_override(Some("http://10.0.0.5:8080".to_string()));
        assert_eq!(config.chat.chat_endpoint(), "http://10.0.0.5:8080/ai/chat");
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "listenboard_config_{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "[dashboard]\npage_buttons = 3\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.dashboard.page_buttons, 3);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(CoreError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
