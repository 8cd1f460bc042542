//! Global configuration with reload notification.
//!
//! Configuration is modeled as an immutable [`GlobalConfig`] snapshot that is
//! replaced atomically on every successful load. Dependents take a snapshot
//! at the start of each event handling and never re-read it mid-handling.
//!
//! Reload callbacks must be registered before the first [`ConfigProvider::load`]
//! so the initial notification is not missed; the provider fires them
//! synchronously after every successful load, including the first.

use crate::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Language value that asks the remote API to auto-detect.
pub const AUTO_LANGUAGE: &str = "auto";

/// Process-wide configuration snapshot.
#[derive(Clone)]
pub struct GlobalConfig {
    /// Base URL of the transcription API (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model name sent with every request.
    pub model_name: String,
    /// Bearer token for the transcription API.
    pub api_key: String,
    /// Default language; [`AUTO_LANGUAGE`] lets the API auto-detect.
    pub language: String,
    /// Reaction key that manually triggers transcription.
    ///
    /// `None` disables reaction-triggered transcription.
    pub reaction: Option<String>,
    /// Default auto-transcribe setting for rooms without an override.
    pub auto: bool,
}

impl GlobalConfig {
    /// Parse a configuration from a JSON string.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let raw: RawConfig = serde_json::from_str(content)?;
        Self::try_from(raw)
    }
}

impl std::fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("api_key", &"[REDACTED]")
            .field("language", &self.language)
            .field("reaction", &self.reaction)
            .field("auto", &self.auto)
            .finish()
    }
}

/// Raw configuration as read from disk, before required-field checks.
#[derive(Debug, Deserialize)]
struct RawConfig {
    base_url: Option<String>,
    model_name: Option<String>,
    api_key: Option<String>,
    language: Option<String>,
    #[serde(default)]
    reaction: Option<String>,
    #[serde(default)]
    auto: Option<bool>,
}

impl TryFrom<RawConfig> for GlobalConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> ConfigResult<Self> {
        fn require(value: Option<String>, field: &str) -> ConfigResult<String> {
            match value {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(ConfigError::missing(field)),
            }
        }

        Ok(Self {
            base_url: require(raw.base_url, "base_url")?,
            model_name: require(raw.model_name, "model_name")?,
            api_key: require(raw.api_key, "api_key")?,
            language: require(raw.language, "language")?,
            reaction: raw.reaction.filter(|r| !r.is_empty()),
            auto: raw.auto.unwrap_or(false),
        })
    }
}

/// Callback invoked after every successful configuration load.
pub type ReloadCallback = Box<dyn Fn() + Send + Sync>;

/// Loads [`GlobalConfig`] from a JSON file and notifies observers on reload.
pub struct ConfigProvider {
    path: PathBuf,
    current: RwLock<Option<Arc<GlobalConfig>>>,
    callbacks: std::sync::Mutex<Vec<ReloadCallback>>,
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ConfigProvider {
    /// Create a provider for the given config file. No load is performed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
            callbacks: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Path of the backing config file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a callback fired after every successful load, including the
    /// first. Register before calling [`Self::load`].
    pub fn on_reload(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Box::new(callback));
    }

    /// Load (or reload) the configuration from disk.
    ///
    /// On success the current snapshot is replaced atomically and all
    /// registered callbacks fire before this returns. On failure the previous
    /// snapshot, if any, stays in place.
    pub async fn load(&self) -> ConfigResult<Arc<GlobalConfig>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let config = Arc::new(GlobalConfig::parse(&content)?);

        *self.current.write().await = Some(Arc::clone(&config));
        info!(path = %self.path.display(), "configuration loaded");

        let callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for callback in callbacks.iter() {
            callback();
        }
        debug!(count = callbacks.len(), "reload callbacks fired");

        Ok(config)
    }

    /// Current configuration snapshot.
    ///
    /// Fails with [`ConfigError::NotLoaded`] if [`Self::load`] has never
    /// succeeded.
    pub async fn snapshot(&self) -> ConfigResult<Arc<GlobalConfig>> {
        self.current
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(ConfigError::NotLoaded)
    }

    /// Whether a configuration has been loaded.
    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }
}

/// Default configuration file path (`~/.stenographer/config.json`).
#[must_use]
pub fn config_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stenographer")
        .join("config.json")
}
