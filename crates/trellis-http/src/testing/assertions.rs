//! Assertions over handler output

use crate::response::{HttpResponse, HttpStatus};

pub trait ResponseAssertions {
    fn assert_ok(&self);
    fn assert_status(&self, expected: HttpStatus);
    fn assert_responded(&self);
    fn assert_body(&self, expected: &str);
    fn assert_json_contains(&self, key: &str, value: serde_json::Value);
}

impl ResponseAssertions for HttpResponse {
    fn assert_ok(&self) {
        self.assert_status(HttpStatus::OK);
    }

    fn assert_status(&self, expected: HttpStatus) {
        assert_eq!(self.status(), expected, "Response status mismatch");
    }

    fn assert_responded(&self) {
        assert!(self.was_responded_to(), "Response was never sent");
    }

    fn assert_body(&self, expected: &str) {
        assert_eq!(self.body_text(), expected, "Response body mismatch");
    }

    fn assert_json_contains(&self, key: &str, value: serde_json::Value) {
        let body: serde_json::Value = serde_json::from_slice(self.body())
            .unwrap_or_else(|e| panic!("Response body is not JSON: {}", e));
        assert_eq!(body.get(key), Some(&value), "JSON field '{}' mismatch", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assertions_pass_on_matching_response() {
        let mut response = HttpResponse::new();
        response.send_json(&json!({"id": 7})).unwrap();

        response.assert_ok();
        response.assert_responded();
        response.assert_json_contains("id", json!(7));
    }

    #[test]
    #[should_panic(expected = "Response status mismatch")]
    fn test_status_mismatch_panics() {
        let mut response = HttpResponse::new();
        response.send_status(HttpStatus::NOT_FOUND);
        response.assert_ok();
    }
}
