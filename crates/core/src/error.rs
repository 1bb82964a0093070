use thiserror::Error;

pub type AudienceResult<T> = Result<T, AudienceError>;

#[derive(Error, Debug)]
pub enum AudienceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Submission rejected with status {status}: {message}")]
    Submission { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid step transition: {0}")]
    InvalidStep(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for AudienceError {
    fn from(e: config::ConfigError) -> Self {
        AudienceError::Config(e.to_string())
    }
}
