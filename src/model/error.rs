//! Error bodies returned by the Spotify Web API and the Spotify Accounts service.

use serde::{de::Visitor, Deserialize, Serialize};

/// Message shown when an error response body couldn't be parsed at all.
pub const UNPARSEABLE_ERROR_MESSAGE: &str = "Failed to parse error response body";

/// The body of an unsuccessful response, parsed on a best-effort basis.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// A regular Web API error: `{"error": {"status": 400, "message": "..."}}`.
    Api(ApiErrorObject),
    /// An OAuth2 error from the accounts service: `{"error": "invalid_grant", "error_description": "..."}`.
    Authentication(AuthenticationErrorResponse),
    /// Valid JSON in some other shape.
    Other(serde_json::Value),
    /// The body wasn't JSON. The raw text is kept as-is.
    Unparseable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorObject,
}

/// The inner object of a regular Web API error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorObject {
    #[serde(default)]
    pub status: Option<u16>,
    pub message: ApiErrorMessage,
}

/// An OAuth2 error response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticationErrorResponse {
    pub error: AuthenticationErrorKind,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// The error codes defined by RFC 6749 section 5.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationErrorKind {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    UnauthorizedClient,
    UnsupportedGrantType,
    InvalidScope,
}

/// The message in a regular Web API error. The two messages Spotify uses for token problems are recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiErrorMessage {
    PermissionsMissing,
    TokenExpired,

    Other(String),
}

impl ErrorBody {
    /// Parses an error response body. Never fails; anything that isn't JSON ends up as [ErrorBody::Unparseable].
    pub fn parse(body: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return Self::Unparseable(body.to_owned()),
        };

        if let Ok(response) = ApiErrorResponse::deserialize(&value) {
            return Self::Api(response.error);
        }

        if let Ok(response) = AuthenticationErrorResponse::deserialize(&value) {
            return Self::Authentication(response);
        }

        Self::Other(value)
    }

    /// A human-readable message describing the error.
    pub fn message(&self) -> String {
        match self {
            ErrorBody::Api(object) => object.message.to_string(),
            ErrorBody::Authentication(response) => match &response.error_description {
                Some(description) => format!("{:?}: {description}", response.error),
                None => format!("{:?}", response.error),
            },
            ErrorBody::Other(value) => value.to_string(),
            ErrorBody::Unparseable(_) => UNPARSEABLE_ERROR_MESSAGE.to_owned(),
        }
    }
}

impl std::fmt::Display for ApiErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorMessage::PermissionsMissing => write!(f, "Permissions missing"),
            ApiErrorMessage::TokenExpired => write!(f, "The access token expired"),
            ApiErrorMessage::Other(message) => write!(f, "{message}"),
        }
    }
}

impl<'de> Deserialize<'de> for ApiErrorMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ApiErrorMessageVisitor;

        impl<'de> Visitor<'de> for ApiErrorMessageVisitor {
            type Value = ApiErrorMessage;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_string(v.to_owned())
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match v.as_str() {
                    "Permissions missing" => Ok(ApiErrorMessage::PermissionsMissing),
                    "The access token expired" | "Token expired" => Ok(ApiErrorMessage::TokenExpired),

                    _ => Ok(ApiErrorMessage::Other(v)),
                }
            }
        }

        deserializer.deserialize_str(ApiErrorMessageVisitor)
    }
}
