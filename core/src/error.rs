//! Error types for the Confluence client.
//!
//! # Design
//! Three failure families are kept apart so callers can tell them apart:
//! - [`BuildError`]: a builder refused to produce a request. Nothing was sent.
//! - [`ApiError::Request`]: the server answered with a non-2xx status.
//! - [`ApiError::Transport`]: the exchange never completed. The transport's
//!   own error is boxed without modification and can be downcast.
//!
//! [`ConfigError`] covers client construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A builder's validation rule was violated at `build()` time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("You must specify the type of content you want to create")]
    MissingCreateType,

    #[error("You must specify the space that the content is being created in")]
    MissingSpaceKey,

    #[error("You must provide an ID when creating a draft")]
    DraftWithoutId,

    #[error("The limit must be a positive number")]
    NonPositiveLimit,

    #[error("The start position must be a positive number")]
    NonPositiveStart,

    #[error("You must specify a CQL query")]
    MissingCql,

    #[error("You must specify the ID of the content you are trying to update")]
    MissingUpdateId,

    #[error("You must specify the type of content you are trying to update")]
    MissingUpdateType,

    #[error("You must specify the new version of the content")]
    MissingVersion,

    /// The search context could not be encoded as a query parameter.
    #[error("invalid CQL context: {0}")]
    CqlContext(String),
}

/// Errors returned while dispatching a request or interpreting its response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request.
    #[error(transparent)]
    Request(#[from] RequestFailure),

    /// The transport could not complete the exchange.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A success response could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// The server-side failure, if this error is one.
    pub fn as_request_failure(&self) -> Option<&RequestFailure> {
        match self {
            ApiError::Request(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A non-2xx response, reduced to its status, a readable message and the
/// structured detail Confluence attaches to JSON error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {message}")]
pub struct RequestFailure {
    pub status: u16,
    pub message: String,
    pub data: Option<ErrorData>,
}

impl RequestFailure {
    /// True for 401/403 or when the server flagged the caller as unauthorized.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self.status, 401 | 403)
            || self.data.as_ref().and_then(|data| data.authorized) == Some(false)
    }

    /// True when the server reported the request as invalid.
    pub fn is_validation_failure(&self) -> bool {
        self.data.as_ref().and_then(|data| data.valid) == Some(false)
    }

    /// Translated messages of every structured error, in server order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.data
            .iter()
            .flat_map(|data| data.errors.iter().flatten())
            .filter_map(|error| error.message.as_ref()?.translation.as_deref())
            .collect()
    }
}

/// The JSON envelope Confluence returns with failed requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: Option<u16>,
    pub message: Option<String>,
    pub data: Option<ErrorData>,
}

impl ErrorResponse {
    /// The first structured translation, falling back to the top-level message.
    pub fn best_message(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.errors.as_ref()?.first())
            .and_then(|error| error.message.as_ref()?.translation.as_deref())
            .or(self.message.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub authorized: Option<bool>,
    pub valid: Option<bool>,
    pub successful: Option<bool>,
    pub errors: Option<Vec<ErrorEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub message: Option<ErrorMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub translation: Option<String>,
    pub key: Option<String>,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

/// Client configuration could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL {0:?} must be an absolute URL without query or fragment")]
    UnsupportedBaseUrl(String),
}
