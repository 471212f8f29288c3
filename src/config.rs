use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What a plain Enter does when no completion popup is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnterKeyBehavior {
    /// Let the editor insert a line break
    #[default]
    Newline,
    /// Run the statement under the cursor
    Execute,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Backend
    pub server_url: String,
    pub default_db_id: Option<i64>,
    pub request_timeout_secs: u64,

    // Editor
    pub enter_key_behavior: EnterKeyBehavior,
    pub upper_case_keywords: bool,
    pub completion_limit: usize,

    /// Chord overrides, e.g. `{"F5": "execute"}`
    pub keybindings: HashMap<String, String>,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            default_db_id: None,
            request_timeout_secs: 30,
            enter_key_behavior: EnterKeyBehavior::Newline,
            upper_case_keywords: true,
            completion_limit: 20,
            keybindings: HashMap::new(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> ConsoleResult<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`.
    ///
    /// A missing file yields defaults. A corrupt file also yields defaults; it
    /// is moved aside to `*.json.corrupt` so it can be inspected.
    pub fn load_from(path: &Path) -> ConsoleResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => {
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> ConsoleResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> ConsoleResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> ConsoleResult<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "server_url must be http(s), got '{}'",
                self.server_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConsoleError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sqlconsole")
        .join("config.json")
}
