//! Error types shared by the settings tree, the timer session and the API

use thiserror::Error;

/// Failures raised by the settings tree and the colour resolver
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No leaf exists at the given path and no default was supplied
    #[error("setting not found: {0}")]
    KeyNotFound(String),

    /// A value could not be converted to the leaf's declared type
    #[error("invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    /// No settings file is bound, or the bound file does not exist
    #[error("settings file not found: {0}")]
    FileNotFound(String),

    /// Colour could not be resolved, even through its default
    #[error("invalid colour: \"{0}\"")]
    InvalidColour(String),

    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SettingsError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failures raised by the shared timer session
#[derive(Debug, Error)]
pub enum AppError {
    /// The session mutex was poisoned by a panicking holder
    #[error("failed to lock {0}")]
    Lock(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
