use axum::http::StatusCode;
use thiserror::Error;

const NO_PROVIDER_MESSAGE: &str = "no error message";

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("places provider unreachable: {0}")]
    Transport(reqwest::Error),
    #[error("places provider answered HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("places provider error: {status} - {message}")]
    Provider { status: String, message: String },
    #[error("invalid places payload: {0}")]
    Decode(String),
    #[error("no place found for id {place_id}")]
    NotFound { place_id: String },
}

/// Request URLs carry the provider credential, so they never reach the message.
impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        PlacesError::Transport(e.without_url())
    }
}

impl PlacesError {
    pub fn provider(status: impl Into<String>, message: Option<String>) -> Self {
        Self::Provider {
            status: status.into(),
            message: message.unwrap_or_else(|| NO_PROVIDER_MESSAGE.to_string()),
        }
    }

    /// Status the HTTP layer answers with when this error escapes a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlacesError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Why a single place record was left out of a batch.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("place record has no identifier")]
    MissingId,
    #[error("place {place_id} has no coordinates")]
    MissingLocation { place_id: String },
}
