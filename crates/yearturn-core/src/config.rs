//! TOML-based configuration.
//!
//! Every field has a default reproducing the New Year 2025 page, so a
//! missing file is not an error. Stored at `~/.config/yearturn/config.toml`
//! unless a path is given explicitly. Configuration is only read at session
//! start; nothing about a running session is ever written back.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::countdown::Deadline;
use crate::error::{ConfigError, ValidationError};
use crate::presentation::{ParticleSettings, DEFAULT_POST_MESSAGES, DEFAULT_PRE_MESSAGES};
use crate::threshold::{ThresholdMode, DEFAULT_THRESHOLD_SECS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Local wall-clock reading, e.g. `2025-01-01T00:00:00`.
    #[serde(default = "default_deadline")]
    pub deadline: NaiveDateTime,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_threshold_secs")]
    pub remaining_secs: u64,
    #[serde(default)]
    pub mode: ThresholdMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_ambient_asset")]
    pub ambient: String,
    #[serde(default = "default_celebration_asset")]
    pub celebration: String,
    #[serde(default = "default_true")]
    pub ambient_loop: bool,
    /// Refuse autoplay until the user has pressed the toggle once.
    #[serde(default = "default_true")]
    pub require_interaction: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_pre_messages")]
    pub pre: Vec<String>,
    #[serde(default = "default_post_messages")]
    pub post: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub particles: ParticleSettings,
}

// Default functions
fn default_deadline() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_threshold_secs() -> u64 {
    DEFAULT_THRESHOLD_SECS
}
fn default_ambient_asset() -> String {
    "audio/intro.mp3".into()
}
fn default_celebration_asset() -> String {
    "audio/newyear.mp3".into()
}
fn default_true() -> bool {
    true
}
fn default_pre_messages() -> Vec<String> {
    DEFAULT_PRE_MESSAGES.iter().map(|m| m.to_string()).collect()
}
fn default_post_messages() -> Vec<String> {
    DEFAULT_POST_MESSAGES.iter().map(|m| m.to_string()).collect()
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            deadline: default_deadline(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            remaining_secs: default_threshold_secs(),
            mode: ThresholdMode::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ambient: default_ambient_asset(),
            celebration: default_celebration_asset(),
            ambient_loop: true,
            require_interaction: true,
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            pre: default_pre_messages(),
            post: default_post_messages(),
        }
    }
}

/// Validated, ready-to-run session parameters.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub deadline: Deadline,
    pub tick_interval: Duration,
    pub threshold_secs: u64,
    pub threshold_mode: ThresholdMode,
    pub pre_messages: Arc<[String]>,
    pub post_messages: Arc<[String]>,
    pub particles: ParticleSettings,
}

impl SessionSettings {
    /// Settings for a session running to `deadline` with every other value
    /// at its default.
    pub fn with_deadline(deadline: Deadline) -> Self {
        let config = Config::default();
        Self {
            deadline,
            tick_interval: Duration::from_millis(config.countdown.tick_interval_ms),
            threshold_secs: config.threshold.remaining_secs,
            threshold_mode: config.threshold.mode,
            pre_messages: config.messages.pre.into(),
            post_messages: config.messages.post.into(),
            particles: config.particles,
        }
    }
}

/// Returns `~/.config/yearturn/`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(home.join(".config").join("yearturn"))
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        value
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`, or return defaults if no file exists there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                })
            }
        };
        toml::from_str(&content).map_err(|err| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Persist to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Validate into session parameters.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        if self.countdown.tick_interval_ms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "countdown.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            }
            .into());
        }
        if self.threshold.remaining_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "threshold.remaining_secs".into(),
                message: "must be greater than zero".into(),
            }
            .into());
        }
        if self.messages.pre.is_empty() {
            return Err(ValidationError::EmptyCollection("messages.pre".into()).into());
        }
        if self.messages.post.is_empty() {
            return Err(ValidationError::EmptyCollection("messages.post".into()).into());
        }
        if self.particles.size_min > self.particles.size_max {
            return Err(ValidationError::InvalidValue {
                field: "particles.size_min".into(),
                message: "must not exceed particles.size_max".into(),
            }
            .into());
        }

        Ok(SessionSettings {
            deadline: Deadline::from_local(self.countdown.deadline)?,
            tick_interval: Duration::from_millis(self.countdown.tick_interval_ms),
            threshold_secs: self.threshold.remaining_secs,
            threshold_mode: self.threshold.mode,
            pre_messages: self.messages.pre.clone().into(),
            post_messages: self.messages.post.clone().into(),
            particles: self.particles.clone(),
        })
    }
}
