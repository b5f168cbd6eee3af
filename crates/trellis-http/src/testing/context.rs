//! Builder for request contexts

use crate::context::HttpContext;
use crate::request::{HttpMethod, HttpRequest};
use serde::Serialize;

/// Builds an [`HttpContext`] the way a listener would
#[derive(Debug, Clone)]
pub struct TestContext {
    request: HttpRequest,
}

impl TestContext {
    pub fn request<U: AsRef<str>>(method: HttpMethod, url: U) -> Self {
        Self {
            request: HttpRequest::new(method, url),
        }
    }

    pub fn get<U: AsRef<str>>(url: U) -> Self {
        Self::request(HttpMethod::GET, url)
    }

    pub fn post<U: AsRef<str>>(url: U) -> Self {
        Self::request(HttpMethod::POST, url)
    }

    pub fn put<U: AsRef<str>>(url: U) -> Self {
        Self::request(HttpMethod::PUT, url)
    }

    pub fn delete<U: AsRef<str>>(url: U) -> Self {
        Self::request(HttpMethod::DELETE, url)
    }

    pub fn header<N: AsRef<str>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.request = self.request.with_body(body);
        self
    }

    /// JSON body with a matching content type
    pub fn json<T: Serialize>(self, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.header("content-type", "application/json").body(body)
    }

    pub fn build(self) -> HttpContext {
        HttpContext::new(self.request)
    }
}
