//! Errors raised by route handlers
//!
//! Handlers return [`HttpResult`]; the router never catches these, it hands
//! them back to whoever called `Router::route` wrapped in
//! [`RoutingError::Handler`](super::RoutingError::Handler).

use crate::response::HttpStatus;
use thiserror::Error;

/// Result type for handler and hook execution
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors produced while a handler processes a request
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Access forbidden: {message}")]
    Forbidden { message: String },

    #[error("Resource already exists: {message}")]
    Conflict { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },

    #[error("Parameter error: {0}")]
    Param(#[from] crate::routing::ParamError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl HttpError {
    /// Create a bad request error
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        HttpError::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        HttpError::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        HttpError::Forbidden {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        HttpError::Conflict {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<T: Into<String>>(message: T) -> Self {
        HttpError::InternalError {
            message: message.into(),
        }
    }

    /// Wrap any error raised inside a handler
    pub fn custom<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HttpError::Custom(Box::new(error))
    }

    /// Status code a dispatcher should answer with when this error escapes a handler
    pub fn status(&self) -> HttpStatus {
        match self {
            HttpError::BadRequest { .. } | HttpError::Param(_) => HttpStatus::BAD_REQUEST,
            HttpError::NotFound { .. } => HttpStatus::NOT_FOUND,
            HttpError::Unauthorized => HttpStatus::UNAUTHORIZED,
            HttpError::Forbidden { .. } => HttpStatus::FORBIDDEN,
            HttpError::Conflict { .. } => HttpStatus::CONFLICT,
            HttpError::InternalError { .. }
            | HttpError::Serialization(_)
            | HttpError::Custom(_) => HttpStatus::INTERNAL_SERVER_ERROR,
        }
    }
}
