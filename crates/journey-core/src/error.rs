use thiserror::Error;

/// Top-level error type for configuration and file handling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JourneyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for JourneyError {
    fn from(err: toml::de::Error) -> Self {
        JourneyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for JourneyError {
    fn from(err: toml::ser::Error) -> Self {
        JourneyError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Journey operations.
pub type Result<T> = std::result::Result<T, JourneyError>;
