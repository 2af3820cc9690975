//! Configuration error types.
//!
//! Resolving the bundle never fails. These errors only come from rendering
//! it into other formats.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while serializing the settings bundle.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to serialize config as TOML.
    #[error("failed to serialize config as TOML: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Failed to serialize config as JSON.
    #[error("failed to serialize config as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
