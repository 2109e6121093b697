use thiserror::Error;

/// Public suffix engine error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Malformed rule at line {line}: {message}")]
    MalformedRule { line: usize, message: String },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PslError {
    /// Whether the error was caused by caller input rather than by the
    /// process itself. The request boundary answers these with a 400.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PslError::InvalidDomain(_))
    }
}

pub type Result<T> = std::result::Result<T, PslError>;
