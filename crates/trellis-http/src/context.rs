//! Per-request context handed to every route

use crate::request::{HttpMethod, HttpRequest};
use crate::response::HttpResponse;
use uuid::Uuid;

/// Request/response pair flowing through the route chain
#[derive(Debug, Clone)]
pub struct HttpContext {
    pub request: HttpRequest,
    pub response: HttpResponse,
    id: Uuid,
}

impl HttpContext {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            response: HttpResponse::new(),
            id: Uuid::new_v4(),
        }
    }

    /// Shorthand for a bodiless request
    pub fn for_request<U: AsRef<str>>(method: HttpMethod, url: U) -> Self {
        Self::new(HttpRequest::new(method, url))
    }

    /// Unique id of this request, used to correlate trace events
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn was_responded_to(&self) -> bool {
        self.response.was_responded_to()
    }
}
