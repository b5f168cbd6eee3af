//! HTTP method vocabulary, including the `ALL` wildcard used by routes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown method name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown HTTP method: {0}")]
pub struct InvalidMethod(pub String);

/// HTTP methods understood by the router
///
/// `ALL` is only meaningful on a route: it matches every request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
    TRACE,
    CONNECT,
    ALL,
}

impl HttpMethod {
    /// Every concrete method, in a stable order
    pub const CONCRETE: [HttpMethod; 9] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::HEAD,
        HttpMethod::OPTIONS,
        HttpMethod::TRACE,
        HttpMethod::CONNECT,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
            HttpMethod::CONNECT => "CONNECT",
            HttpMethod::ALL => "ALL",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, HttpMethod::ALL)
    }

    /// Wildcard-aware comparison
    ///
    /// `ALL` is equivalent to every method in either position. This is not an
    /// equivalence relation (GET ~ ALL ~ POST but GET !~ POST), which is why
    /// routes only implement `PartialEq`.
    pub fn is_equivalent_to(&self, other: &HttpMethod) -> bool {
        self.is_wildcard() || other.is_wildcard() || self == other
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::ALL
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            "HEAD" => Ok(HttpMethod::HEAD),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            "TRACE" => Ok(HttpMethod::TRACE),
            "CONNECT" => Ok(HttpMethod::CONNECT),
            "ALL" | "*" => Ok(HttpMethod::ALL),
            _ => Err(InvalidMethod(s.to_string())),
        }
    }
}
