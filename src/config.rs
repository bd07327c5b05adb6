use crate::query::scanner::ScanOptions;
use crate::query::token::PatternKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_NAME: &str = "querylens";
const CONFIG_FILE: &str = "config.json";

pub const ENV_COMMENTS: &str = "QUERYLENS_COMMENTS";
pub const ENV_PATTERN_TYPE: &str = "QUERYLENS_PATTERN_TYPE";
pub const ENV_DECORATE: &str = "QUERYLENS_DECORATE";

/// User configuration, read from `config.json` in the app config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Treat `//` as the start of a line comment
    #[serde(default = "default_interpret_comments")]
    pub interpret_comments: bool,

    /// Pattern type assigned to scanned patterns
    #[serde(default)]
    pub pattern_type: PatternKind,

    /// Run the meta-decorator before highlighting and hover
    #[serde(default = "default_decorate")]
    pub decorate: bool,
}

fn default_interpret_comments() -> bool {
    false
}

fn default_decorate() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interpret_comments: default_interpret_comments(),
            pattern_type: PatternKind::default(),
            decorate: default_decorate(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file (if any), then environment overrides
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&get_config_path()?)?;
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `QUERYLENS_*` overrides; unparsable values are ignored with a warning
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_COMMENTS) {
            match parse_bool(&val) {
                Some(flag) => self.interpret_comments = flag,
                None => warn!(value = %val, "ignoring invalid {}", ENV_COMMENTS),
            }
        }

        if let Some(val) = lookup(ENV_PATTERN_TYPE) {
            match val.parse() {
                Ok(kind) => self.pattern_type = kind,
                Err(err) => warn!(error = %err, "ignoring invalid {}", ENV_PATTERN_TYPE),
            }
        }

        if let Some(val) = lookup(ENV_DECORATE) {
            match parse_bool(&val) {
                Some(flag) => self.decorate = flag,
                None => warn!(value = %val, "ignoring invalid {}", ENV_DECORATE),
            }
        }

        self
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            interpret_comments: self.interpret_comments,
            pattern_kind: self.pattern_type,
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Per-platform application directory; not created on read
pub fn get_config_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::config_local_dir()
    } else {
        // XDG_CONFIG_HOME or ~/.config
        dirs::config_dir()
    };

    let base = base.context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}
