//! Dispatch server
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trellis_http::{ChannelListener, HttpMethod, Router, RestServer, ServerConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.register_fn_at(
//!     |ctx: &mut trellis_http::HttpContext| {
//!         ctx.response.send_text("pong");
//!         Ok(())
//!     },
//!     HttpMethod::GET,
//!     "/ping",
//! )?;
//!
//! let (listener, _client) = ChannelListener::pair(16);
//! let server = RestServer::new(listener, router, ServerConfig::default());
//! server.run().await;
//! # Ok(())
//! # }
//! ```

use super::Listener;
use crate::config::ServerConfig;
use crate::context::HttpContext;
use crate::errors::RoutingError;
use crate::response::HttpStatus;
use crate::routing::Router;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinError, JoinSet};

/// Accepts contexts from a listener and routes each on the blocking pool
pub struct RestServer<L: Listener> {
    listener: Arc<L>,
    router: Arc<Router>,
    config: ServerConfig,
    shutdown: watch::Sender<bool>,
}

impl<L: Listener> RestServer<L> {
    pub fn new<R: Into<Arc<Router>>>(listener: L, router: R, config: ServerConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            listener: Arc::new(listener),
            router: router.into(),
            config,
            shutdown,
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Ask [`run`](Self::run) to stop accepting and drain in-flight requests
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Serve until the listener closes or [`stop`](Self::stop) is called
    ///
    /// At most `max_concurrent_requests` requests are routed at once.
    /// In-flight requests get `shutdown_timeout_secs` to finish before they
    /// are abandoned.
    pub async fn run(&self) {
        let mut shutdown = self.shutdown.subscribe();
        if *shutdown.borrow_and_update() {
            return;
        }

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_requests.max(1)));
        let mut tasks = JoinSet::new();
        tracing::info!(
            target: "trellis::server",
            routes = self.router.len(),
            max_concurrent_requests = self.config.max_concurrent_requests,
            "Server started"
        );

        loop {
            let permit = tokio::select! {
                _ = shutdown.changed() => break,
                permit = Arc::clone(&permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let accepted = loop {
                tokio::select! {
                    _ = shutdown.changed() => break None,
                    Some(joined) = tasks.join_next(), if !tasks.is_empty() => report(joined),
                    accepted = self.listener.accept() => break accepted,
                }
            };
            let Some(context) = accepted else {
                break;
            };

            let router = Arc::clone(&self.router);
            let listener = Arc::clone(&self.listener);
            tasks.spawn(async move {
                let _permit = permit;
                let handled = tokio::task::spawn_blocking(move || {
                    let mut context = context;
                    dispatch(&router, &mut context);
                    context
                })
                .await;

                match handled {
                    Ok(context) => listener.send(context).await,
                    Err(error) => {
                        tracing::error!(target: "trellis::server", %error, "Request handler panicked")
                    }
                }
            });
        }

        let in_flight = tasks.len();
        let drain = async {
            while let Some(joined) = tasks.join_next().await {
                report(joined);
            }
        };
        if tokio::time::timeout(self.config.shutdown_timeout(), drain)
            .await
            .is_err()
        {
            tracing::warn!(
                target: "trellis::server",
                in_flight,
                "Shutdown timeout elapsed, abandoning in-flight requests"
            );
            tasks.abort_all();
        }
        tracing::info!(target: "trellis::server", "Server stopped");
    }
}

fn report(joined: Result<(), JoinError>) {
    if let Err(error) = joined {
        if !error.is_cancelled() {
            tracing::error!(target: "trellis::server", %error, "Request task failed");
        }
    }
}

/// Route one context and make sure it ends up with a response
///
/// No matching route, or routes that never responded, answer 404. A
/// handler error answers with its own status unless a response was already
/// sent. Any other routing failure answers 500.
pub fn dispatch(router: &Router, context: &mut HttpContext) {
    match router.route(context) {
        Ok(_) => {
            if !context.was_responded_to() {
                context.response.send_status_text(HttpStatus::NOT_FOUND);
            }
        }
        Err(RoutingError::RouteNotFound { method, path }) => {
            tracing::debug!(target: "trellis::server", %method, %path, "No route matched");
            context.response.send_status_text(HttpStatus::NOT_FOUND);
        }
        Err(RoutingError::Handler(error)) => {
            tracing::warn!(
                target: "trellis::server",
                request_id = %context.id(),
                %error,
                "Handler failed"
            );
            if !context.was_responded_to() {
                context.response.send_status_text(error.status());
            }
        }
        Err(error) => {
            tracing::error!(
                target: "trellis::server",
                request_id = %context.id(),
                %error,
                "Routing failed"
            );
            if !context.was_responded_to() {
                context
                    .response
                    .send_status_text(HttpStatus::INTERNAL_SERVER_ERROR);
            }
        }
    }
}
