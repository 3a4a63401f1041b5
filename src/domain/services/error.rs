use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Network or timeout failure talking to an external service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A model response did not parse into the expected structured shape.
    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    /// Missing credentials, dimension mismatch, invalid metadata schema.
    /// Fatal for the request; never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedOutput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error must propagate to the caller instead of being
    /// absorbed into a fallback answer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvalidInput(_))
    }
}
