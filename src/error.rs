use reqwest::{Method, StatusCode};
use thiserror::Error;

use crate::model::error::{ApiErrorMessage, ErrorBody};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Spotify answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response was received.
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("This operation requires the application's client secret, but the client was built without one")]
    MissingClientSecret,

    #[error("The bearer token contains characters that aren't allowed in an HTTP header")]
    InvalidBearerToken,

    #[error("The given state does not match the original state")]
    StateMismatch,

    #[error("Invalid authorization callback: {0}")]
    InvalidCallback(String),

    #[error("Unexpected error while requesting {endpoint}: {message}")]
    Unexpected { endpoint: String, message: String },
}

/// An HTTP-level failure: Spotify responded, but with a non-2xx status.
#[derive(Debug, Error)]
#[error("Spotify API error {} {status_text} from {method} {endpoint}: {}", .status.as_u16(), .body.message())]
pub struct ApiError {
    pub status: StatusCode,
    pub status_text: String,
    pub method: Method,
    pub endpoint: String,
    /// The query parameters or body the request was sent with. Form-encoded bodies are never included.
    pub params: Option<serde_json::Value>,
    pub body: ErrorBody,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_after: Option<u64>,
}

/// A transport failure: the request could not be sent or its response could not be read.
#[derive(Debug, Error)]
#[error("Network error during {method} {endpoint}: {source}")]
pub struct NetworkError {
    pub method: Method,
    pub endpoint: String,
    pub params: Option<serde_json::Value>,
    #[source]
    pub source: reqwest::Error,
}

impl ApiError {
    /// The error message from the response body, or a placeholder if the body couldn't be parsed.
    pub fn message(&self) -> String {
        self.body.message()
    }

    pub fn is_token_expired(&self) -> bool {
        matches!(
            &self.body,
            ErrorBody::Api(object) if object.message == ApiErrorMessage::TokenExpired
        )
    }

    pub fn is_permissions_missing(&self) -> bool {
        matches!(
            &self.body,
            ErrorBody::Api(object) if object.message == ApiErrorMessage::PermissionsMissing
        )
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }
}

impl Error {
    pub(crate) fn unexpected<E, M>(endpoint: E, message: M) -> Self
    where
        E: Into<String>,
        M: ToString,
    {
        Self::Unexpected {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// The HTTP status code, if this is an [API error](Error::Api).
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }
}
