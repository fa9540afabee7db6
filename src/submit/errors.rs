use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submit session closed")]
    SessionClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SubmitError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Error alias
pub type Result<T, E = SubmitError> = std::result::Result<T, E>;
