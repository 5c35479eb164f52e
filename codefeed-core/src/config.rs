use crate::{ConfigError, SessionContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable pointing at the configuration file.
pub const CONFIG_ENV_VAR: &str = "CODEFEED_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "codefeed.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub verifier: VerifierConfig,
    pub database: DatabaseConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Posts fetched per infinite-scroll batch
    pub page_size: usize,
    /// Simulated network latency for synthetic batches
    pub load_delay_ms: u64,
    /// Stop generating after this many pages; unbounded when absent
    pub max_pages: Option<u32>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            load_delay_ms: 800,
            max_pages: None,
        }
    }
}

impl FeedConfig {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierKind {
    #[default]
    Heuristic,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    pub kind: VerifierKind,
    pub delay_ms: u64,
    pub min_solution_length: usize,
    /// OpenAI-compatible endpoint, e.g. http://localhost:11434/v1
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            kind: VerifierKind::Heuristic,
            delay_ms: 1500,
            min_solution_length: 10,
            api_url: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

impl VerifierConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://codefeed.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a notification stays on screen
    pub notification_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_secs: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: String,
    pub display_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: "local-user".to_string(),
            display_name: "You".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn to_context(&self) -> SessionContext {
        SessionContext::new(self.user_id.clone(), self.display_name.clone())
    }
}

impl AppConfig {
    /// Loads from `$CODEFEED_CONFIG`, falling back to `./codefeed.toml`.
    /// A missing default file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load_from(path),
            Err(_) => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    info!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            let path = path.display().to_string();
            match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::FileNotFound { path },
                std::io::ErrorKind::PermissionDenied => ConfigError::PermissionDenied { path },
                _ => ConfigError::Unreadable {
                    path,
                    reason: e.to_string(),
                },
            }
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.page_size".to_string(),
                value: "0".to_string(),
            });
        }
        if self.verifier.kind == VerifierKind::Llm
            && self.verifier.api_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::ValidationFailed {
                reason: "verifier.api_url is required for the llm verifier".to_string(),
            });
        }
        if self.session.user_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.user_id".to_string(),
                value: self.session.user_id.clone(),
            });
        }
        Ok(())
    }
}
