//! Routing core
//!
//! - path template compilation ([`PathPattern`])
//! - path parameter binding ([`PathParams`])
//! - routes and their handler identity ([`Route`])
//! - the ordered, deduplicated route table and dispatch ([`Router`])

pub mod params;
pub mod pattern;
pub mod route;
pub mod router;

pub use params::{ParamError, PathParams};
pub use pattern::{PathPattern, PatternError};
pub use route::{Handler, Hook, Route};
pub use router::{RouteSource, Router};

pub use crate::errors::{RoutingError, RoutingResult};

use crate::request::HttpMethod;
use serde::{Deserialize, Serialize};

/// Serializable summary of a registered route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<String>,
    pub enabled: bool,
}

impl From<&Route> for RouteInfo {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name().to_string(),
            method: route.http_method(),
            path: route.path_info().to_string(),
            params: route.pattern().params().to_vec(),
            enabled: route.is_enabled(),
        }
    }
}
