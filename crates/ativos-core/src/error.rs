use thiserror::Error;

/// Top-level error type for the Ativos workspace.
///
/// Covers the cross-cutting concerns (configuration, I/O, serialization).
/// Feature crates define their own error types and convert where the `?`
/// operator needs to cross a crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtivosError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AtivosError {
    fn from(err: toml::de::Error) -> Self {
        AtivosError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AtivosError {
    fn from(err: toml::ser::Error) -> Self {
        AtivosError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AtivosError {
    fn from(err: serde_json::Error) -> Self {
        AtivosError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Ativos operations.
pub type Result<T> = std::result::Result<T, AtivosError>;
