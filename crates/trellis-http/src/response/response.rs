//! Transport-independent response representation

use super::HttpStatus;
use crate::errors::HttpResult;
use serde::Serialize;
use std::collections::HashMap;

/// Outgoing response written by routes
///
/// `was_responded_to` is the only signal the router consults between routes:
/// once set, later routes are skipped unless the router is configured to keep
/// going.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    status: HttpStatus,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    was_responded_to: bool,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn set_status(&mut self, status: HttpStatus) {
        self.status = status;
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn set_header<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, lossy
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn was_responded_to(&self) -> bool {
        self.was_responded_to
    }

    /// Mark the response as sent without touching status or body
    pub fn mark_responded(&mut self) {
        self.was_responded_to = true;
    }

    /// Send raw bytes with the current status
    pub fn send_bytes<B: Into<Vec<u8>>>(&mut self, body: B) {
        self.body = body.into();
        self.was_responded_to = true;
    }

    /// Send a plain text body
    pub fn send_text<T: Into<String>>(&mut self, text: T) {
        self.set_header("content-type", "text/plain; charset=utf-8");
        self.send_bytes(text.into().into_bytes());
    }

    /// Serialize and send a JSON body
    pub fn send_json<T: Serialize>(&mut self, value: &T) -> HttpResult<()> {
        let body = serde_json::to_vec(value)?;
        self.set_header("content-type", "application/json");
        self.send_bytes(body);
        Ok(())
    }

    /// Send an empty body with the given status
    pub fn send_status(&mut self, status: HttpStatus) {
        self.status = status;
        self.send_bytes(Vec::new());
    }

    /// Send a status with its reason phrase as the body
    pub fn send_status_text(&mut self, status: HttpStatus) {
        self.status = status;
        self.send_text(status.to_string());
    }
}
