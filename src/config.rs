use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::history::DEFAULT_HISTORY_CAP;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Idle window of the scroll debounce, milliseconds.
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
    /// Post-snap delay before the centered word is read back, milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Remote collector for history entries; None disables forwarding.
    #[serde(default)]
    pub sync_url: Option<String>,
}

fn default_theme() -> String {
    "midnight".to_string()
}
fn default_language() -> String {
    "fr".to_string()
}
fn default_idle_ms() -> u64 {
    100
}
fn default_settle_ms() -> u64 {
    350
}
fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
            idle_ms: default_idle_ms(),
            settle_ms: default_settle_ms(),
            history_cap: default_history_cap(),
            sync_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordwheel")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown keys after
    /// deserialization, so a stale or hand-edited config can't put the
    /// engine outside its tuning envelope.
    pub fn validate(&mut self) {
        self.idle_ms = self.idle_ms.clamp(60, 150);
        self.settle_ms = self.settle_ms.clamp(100, 1000);
        self.history_cap = self.history_cap.clamp(10, 20);
        if crate::engine::Language::from_code(&self.language).is_none() {
            self.language = default_language();
        }
        if self.theme.is_empty() {
            self.theme = default_theme();
        }
    }
}
