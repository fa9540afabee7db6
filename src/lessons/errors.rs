use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {status_code}")]
    Server { status_code: u16 },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn server(status_code: u16) -> Self {
        Self::Server { status_code }
    }
}

/// Error alias
pub type Result<T, E = FetchError> = std::result::Result<T, E>;
