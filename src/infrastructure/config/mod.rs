//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub users: UsersConfig,
    /// Per-group settings keyed by group id
    #[serde(default)]
    pub groups: BTreeMap<String, GroupConfig>,
    #[serde(default)]
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// Markers that turn a message into a command
    pub prefixes: Vec<String>,
    /// Global switch; when off only the diagnostic command is served
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_diagnostic_command")]
    pub diagnostic_command: String,
}

/// Outbound block-list; entries are patterns
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionConfig {
    pub sweep_interval_secs: u64,
    pub idle_threshold_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CooldownConfig {
    pub seconds: u64,
}

/// Users with elevated levels, seeded into the user store
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UsersConfig {
    pub owners: Vec<String>,
    pub admins: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupConfig {
    #[serde(default)]
    pub disabled_commands: Vec<String>,
    #[serde(default)]
    pub helpers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Sender id used for chat lines typed at the console
    pub user_id: String,
}

fn default_true() -> bool {
    true
}

fn default_diagnostic_command() -> String {
    "debug".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 180,
            idle_threshold_secs: 180,
        }
    }
}

impl SessionConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self { seconds: 5 }
    }
}

impl CooldownConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "comet-bot".to_string(),
                prefixes: vec!["/".to_string(), "!".to_string(), "#".to_string()],
                enabled: true,
                diagnostic_command: default_diagnostic_command(),
            },
            filter: FilterConfig::default(),
            sessions: SessionConfig::default(),
            cooldown: CooldownConfig::default(),
            users: UsersConfig::default(),
            groups: BTreeMap::new(),
            adapters: AdaptersConfig {
                console: Some(ConsoleConfig {
                    enabled: true,
                    user_id: "console".to_string(),
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
        if self.bot.prefixes.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::MissingField("bot.prefixes".to_string()));
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "sessions.sweep-interval-secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `BOT_*` overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(prefixes) = lookup("BOT_PREFIXES") {
            let prefixes = split_list(&prefixes);
            if !prefixes.is_empty() {
                self.bot.prefixes = prefixes;
            }
        }

        if let Some(words) = lookup("BOT_FILTER_WORDS") {
            self.filter.words = split_list(&words);
        }

        if let Some(owners) = lookup("BOT_OWNERS") {
            self.users.owners = split_list(&owners);
        }

        if let Some(enabled) = lookup("BOT_ENABLED") {
            if let Ok(enabled) = enabled.parse() {
                self.bot.enabled = enabled;
            }
        }
    }

    pub fn console_enabled(&self) -> bool {
        self.adapters.console.as_ref().map_or(false, |c| c.enabled)
    }

    pub fn console_user_id(&self) -> &str {
        self.adapters
            .console
            .as_ref()
            .map(|c| c.user_id.as_str())
            .unwrap_or("console")
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
