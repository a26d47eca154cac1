//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    /// Groups the title command answers in
    #[serde(default)]
    pub groups: Vec<String>,
    /// Users allowed to flip the feature switch, seeded into the store at startup
    #[serde(default)]
    pub operators: Vec<String>,
    #[serde(default)]
    pub title: TitleConfig,
    pub storage: StorageConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub switch_command: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TitleConfig {
    /// Longest accepted title in characters; unset forwards anything
    #[serde(default)]
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Sqlite,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub onebot: Option<OneBotConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OneBotConfig {
    pub enabled: bool,
    pub base_url: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

/// Transport picked for `run`
#[derive(Debug, Clone)]
pub enum ActiveAdapter {
    OneBot(OneBotConfig),
    Console,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "give-me-title".to_string(),
                switch_command: "gmt".to_string(),
            },
            groups: vec!["1049103154".to_string()],
            operators: Vec::new(),
            title: TitleConfig::default(),
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                path: PathBuf::from("data/GiveMeTitle/data.db"),
            },
            adapters: AdaptersConfig {
                onebot: Some(OneBotConfig {
                    enabled: false,
                    base_url: "http://127.0.0.1:3000".to_string(),
                    access_token: None,
                }),
                console: Some(ConsoleConfig {
                    enabled: true,
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.switch_command.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.switch-command".to_string()));
        }
        if self.title.max_length == Some(0) {
            return Err(ConfigError::InvalidValue("title.max-length must be positive".to_string()));
        }
        if let Some(onebot) = self.adapters.onebot.as_ref().filter(|o| o.enabled) {
            if onebot.base_url.trim().is_empty() {
                return Err(ConfigError::MissingField("adapters.onebot.base-url".to_string()));
            }
        }
        Ok(())
    }

    /// OneBot wins when both adapters are enabled
    pub fn active_adapter(&self) -> Result<ActiveAdapter, ConfigError> {
        if let Some(onebot) = self.adapters.onebot.as_ref().filter(|o| o.enabled) {
            return Ok(ActiveAdapter::OneBot(onebot.clone()));
        }
        if self.adapters.console.as_ref().is_some_and(|c| c.enabled) {
            return Ok(ActiveAdapter::Console);
        }
        Err(ConfigError::InvalidValue("no adapter enabled under adapters".to_string()))
    }

    /// Apply environment overrides on top of `self`
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("ONEBOT_URL") {
            let onebot = self.adapters.onebot.get_or_insert(OneBotConfig {
                enabled: true,
                base_url: String::new(),
                access_token: None,
            });
            onebot.base_url = url;
            onebot.enabled = true;
        }

        if let Ok(token) = std::env::var("ONEBOT_TOKEN") {
            if let Some(ref mut onebot) = self.adapters.onebot {
                onebot.access_token = Some(token);
            }
        }

        self
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }
}
