//! Unified error types for the stenographer plugin.
//!
//! Each concern carries its own error enum; everything converts into the
//! top-level [`PluginError`] so handlers can bubble failures with `?`.

use crate::transcription::TranscribeError;

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for plugin operations.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Configuration error.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// Preference store error.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Media attachment error.
    #[error("media: {0}")]
    Media(#[from] MediaError),

    /// Chat client error.
    #[error("client: {0}")]
    Client(#[from] ClientError),

    /// Transcription error.
    #[error("transcription: {0}")]
    Transcribe(#[from] TranscribeError),

    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl PluginError {
    /// Create a config error from a string.
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(ConfigError::Invalid(msg.into()))
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing required field.
    #[error("missing required field: {0}")]
    Missing(String),

    /// Invalid value.
    #[error("invalid: {0}")]
    Invalid(String),

    /// Configuration read before the first successful load.
    #[error("configuration has not been loaded")]
    NotLoaded,
}

impl ConfigError {
    /// Create a missing field error.
    #[inline]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Create an invalid value error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Storage Errors
// ============================================================================

/// Error type for preference store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for preference store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ============================================================================
// Media Errors
// ============================================================================

/// Error type for audio attachment handling.
///
/// Media failures are logged and dropped; they never produce a reply in the
/// room (see the router's `dispatch`).
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Message carries neither a plain URL nor an encrypted file reference.
    #[error("audio message has no media reference")]
    Missing,

    /// Downloaded payload is empty.
    #[error("media payload is empty")]
    Empty,

    /// Download failed.
    #[error("download failed: {0}")]
    Download(String),

    /// Decryption of an encrypted attachment failed.
    #[error("decrypt failed: {0}")]
    Decrypt(String),
}

/// Result type for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;

// ============================================================================
// Chat Client Errors
// ============================================================================

/// Error type for chat client operations (event lookup, replies).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Referenced event could not be found.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// Event lookup failed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Sending a reply failed.
    #[error("send failed: {0}")]
    Send(String),
}

impl ClientError {
    /// Create a fetch error.
    #[inline]
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a send error.
    #[inline]
    pub fn send(msg: impl Into<String>) -> Self {
        Self::Send(msg.into())
    }
}

/// Result type for chat client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

// ============================================================================
// Tests
// ============================================================================
