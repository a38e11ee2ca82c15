use reqwest::{Method, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NoSelection(String),

    #[error("{method} {path} failed with status {status}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Whether the failure was detected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NoSelection(_))
    }

    /// Status code of a rejected request, if the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
