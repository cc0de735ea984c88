use crate::error::{NotezyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LINE_WIDTH: usize = 100;
const MIN_LINE_WIDTH: usize = 40;

pub const CONFIG_KEYS: [&str; 3] = ["log-level", "line-width", "confirm-delete"];

/// Configuration for notezy, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotezyConfig {
    /// Default tracing filter when NOTEZY_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Width of the note list in the terminal
    #[serde(default = "default_line_width")]
    pub line_width: usize,

    /// Require `--yes` before deleting a note
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_line_width() -> usize {
    DEFAULT_LINE_WIDTH
}

fn default_confirm_delete() -> bool {
    true
}

impl Default for NotezyConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            line_width: default_line_width(),
            confirm_delete: default_confirm_delete(),
        }
    }
}

impl NotezyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: NotezyConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "log-level" => Some(self.log_level.clone()),
            "line-width" => Some(self.line_width.to_string()),
            "confirm-delete" => Some(self.confirm_delete.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "log-level" => {
                if value.trim().is_empty() {
                    return Err(NotezyError::Config("log-level cannot be empty".into()));
                }
                self.log_level = value.trim().to_string();
            }
            "line-width" => {
                let width: usize = value
                    .parse()
                    .map_err(|_| NotezyError::Config(format!("Invalid line-width: {}", value)))?;
                if width < MIN_LINE_WIDTH {
                    return Err(NotezyError::Config(format!(
                        "line-width must be at least {}",
                        MIN_LINE_WIDTH
                    )));
                }
                self.line_width = width;
            }
            "confirm-delete" => {
                self.confirm_delete = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => {
                        return Err(NotezyError::Config(format!(
                            "Invalid confirm-delete: {} (expected true or false)",
                            value
                        )))
                    }
                };
            }
            _ => return Err(NotezyError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}
