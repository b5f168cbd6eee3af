//! Transport-independent request representation
//!
//! The listener that accepted the connection fills this in; the routing core
//! only reads [`HttpRequest::method`] and [`HttpRequest::path_info`] and writes
//! into [`HttpRequest::params`].

use super::HttpMethod;
use crate::errors::{HttpError, HttpResult};
use crate::routing::PathParams;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Incoming request as seen by routes
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    method: HttpMethod,
    path_info: String,
    query_string: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    /// Path parameters bound by the matching route
    pub params: PathParams,
}

impl HttpRequest {
    /// Create a request from a method and a raw url (`/path?query`)
    pub fn new<U: AsRef<str>>(method: HttpMethod, url: U) -> Self {
        let url = url.as_ref();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (url, None),
        };

        Self {
            method,
            path_info: path.to_string(),
            query_string: query,
            ..Default::default()
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path_info(&self) -> &str {
        &self.path_info
    }

    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// Decode the query string into name/value pairs
    pub fn query_pairs(&self) -> HttpResult<Vec<(String, String)>> {
        match &self.query_string {
            Some(query) => serde_urlencoded::from_str(query)
                .map_err(|e| HttpError::bad_request(format!("Malformed query string: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    /// Deserialize the query string into a typed value
    pub fn query<T: DeserializeOwned>(&self) -> HttpResult<T> {
        serde_urlencoded::from_str(self.query_string.as_deref().unwrap_or(""))
            .map_err(|e| HttpError::bad_request(format!("Malformed query string: {}", e)))
    }

    /// Header lookup, case-insensitive on the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn with_header<N: AsRef<str>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> HttpResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HttpError::bad_request(format!("Invalid JSON body: {}", e)))
    }
}
