use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKBOARD_CONFIG_PATH";
const LISTEN_ENV_VAR: &str = "TASKBOARD_LISTEN";
const API_URL_ENV_VAR: &str = "TASKBOARD_API_URL";
const USER_ENV_VAR: &str = "TASKBOARD_USER";
const STORE_ENV_VAR: &str = "TASKBOARD_STORE_PATH";

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.map(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;244m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;246m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> String {
    match canonicalize_key(raw).as_deref() {
        None | Some("vanilla") | Some("light") => "default".to_string(),
        Some("dark") | Some("dark_mode") | Some("darkmode") => "noir".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Lowercases ASCII alphanumerics and folds every other run into `_`.
fn canonicalize_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listen: Option<String>,
    #[serde(default)]
    pub store_path: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl Config {
    pub fn listen_addr(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Layers the `TASKBOARD_*` environment variables over the file values.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(listen) = read(LISTEN_ENV_VAR) {
            self.listen = Some(listen);
        }
        if let Some(store_path) = read(STORE_ENV_VAR) {
            self.store_path = Some(store_path);
        }
        if let Some(api_url) = read(API_URL_ENV_VAR) {
            self.api_url = Some(api_url);
        }
        if let Some(user) = read(USER_ENV_VAR) {
            self.user = Some(user);
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Listen,
    StorePath,
    ApiUrl,
    User,
    Theme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub key: ConfigKey,
    pub value: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub entries: Vec<ParsedConfigOverride>,
}

impl ConfigOverrides {
    pub fn parse_all(raw: &[String]) -> Result<Self, AppError> {
        let entries = raw
            .iter()
            .map(|entry| parse_config_override(entry).map_err(AppError::validation))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let canonical_key =
        canonicalize_key(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let key = match canonical_key.as_str() {
        "listen" => ConfigKey::Listen,
        "store_path" | "store" => ConfigKey::StorePath,
        "api_url" | "api" => ConfigKey::ApiUrl,
        "user" => ConfigKey::User,
        "theme" => ConfigKey::Theme,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride {
        key,
        value: value_raw.trim().to_string(),
    })
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::unexpected("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskboard")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::unexpected("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskboard")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::unexpected(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::validation(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.map(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    for entry in &overrides.entries {
        let value = Some(entry.value.clone());
        match entry.key {
            ConfigKey::Listen => merged.listen = value,
            ConfigKey::StorePath => merged.store_path = value,
            ConfigKey::ApiUrl => merged.api_url = value,
            ConfigKey::User => merged.user = value,
            ConfigKey::Theme => merged.theme = Some(canonical_theme_name(&entry.value)),
        }
    }
    merged
}
