//! Error types for the link server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Link Error Enum ==
/// Unified error type for link operations.
#[derive(Error, Debug)]
pub enum LinkError {
    /// URL is blank, unparseable or not http(s)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Negative TTL or click limit, or another rejected argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No unique code could be generated within the retry bound
    #[error("Could not generate a unique code after {0} attempts")]
    ExhaustedCodeSpace(usize),

    /// Code is not in the store
    #[error("Link not found: {0}")]
    NotFound(String),

    /// Requester does not own the link
    #[error("Not the owner of link: {0}")]
    Forbidden(String),

    /// Link was evicted on access (expired or click budget spent)
    #[error("Link is no longer available: {0}")]
    Gone(String),

    /// Request carried no owner identity
    #[error("Missing owner id")]
    MissingOwner,

    /// Reading or writing the data file failed
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::Persistence(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let status = match &self {
            LinkError::InvalidUrl(_) | LinkError::InvalidArgument(_) | LinkError::MissingOwner => {
                StatusCode::BAD_REQUEST
            }
            LinkError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkError::Forbidden(_) => StatusCode::FORBIDDEN,
            LinkError::Gone(_) => StatusCode::GONE,
            LinkError::ExhaustedCodeSpace(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinkError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;
