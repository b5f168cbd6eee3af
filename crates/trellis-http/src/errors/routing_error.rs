//! Routing error taxonomy
//!
//! Everything the route table, the scanner and the dispatcher can fail with.
//! Handler failures pass through untouched as [`RoutingError::Handler`].

use super::HttpError;
use crate::request::HttpMethod;
use crate::routing::PatternError;
use thiserror::Error;

/// Result type for route construction, scanning and dispatch
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Errors raised by the routing core
#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Method {method} cannot be used as a route: {reason}")]
    InvalidRouteSignature { method: String, reason: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Route not found for {method} {path}")]
    RouteNotFound { method: HttpMethod, path: String },

    #[error("Argument cannot be null: {argument}")]
    ArgumentNull { argument: String },

    #[error("Invalid argument: {message}")]
    ArgumentInvalid { message: String },

    #[error(transparent)]
    Handler(#[from] HttpError),
}

impl RoutingError {
    /// Create an invalid signature error for a named method
    pub fn invalid_signature<M: Into<String>, R: Into<String>>(method: M, reason: R) -> Self {
        RoutingError::InvalidRouteSignature {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Create a route not found error
    pub fn route_not_found<P: Into<String>>(method: HttpMethod, path: P) -> Self {
        RoutingError::RouteNotFound {
            method,
            path: path.into(),
        }
    }

    /// Create a null argument error
    pub fn argument_null<T: Into<String>>(argument: T) -> Self {
        RoutingError::ArgumentNull {
            argument: argument.into(),
        }
    }

    /// Create an invalid argument error
    pub fn argument_invalid<T: Into<String>>(message: T) -> Self {
        RoutingError::ArgumentInvalid {
            message: message.into(),
        }
    }

    /// True when no route matched the request
    pub fn is_not_found(&self) -> bool {
        matches!(self, RoutingError::RouteNotFound { .. })
    }
}
