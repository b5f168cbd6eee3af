//! Listener abstraction and the in-memory channel listener
//!
//! ```rust
//! use trellis_http::{ChannelListener, HttpContext, HttpMethod, Listener};
//!
//! # tokio_test::block_on(async {
//! let (listener, mut client) = ChannelListener::pair(4);
//! client
//!     .submit(HttpContext::for_request(HttpMethod::GET, "/ping"))
//!     .await
//!     .unwrap();
//!
//! let mut context = listener.accept().await.unwrap();
//! context.response.send_text("pong");
//! listener.send(context).await;
//!
//! let answered = client.recv().await.unwrap();
//! assert_eq!(answered.response.body_text(), "pong");
//! # });
//! ```

use crate::context::HttpContext;
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

/// Source of requests and sink for their responses
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Next accepted request, or `None` once the listener is closed
    async fn accept(&self) -> Option<HttpContext>;

    /// Deliver an answered context back to its client
    async fn send(&self, context: HttpContext);
}

/// Listener fed through tokio channels
///
/// Useful for embedding the router behind another transport and for tests.
#[derive(Debug)]
pub struct ChannelListener {
    requests: Mutex<mpsc::Receiver<HttpContext>>,
    responses: mpsc::UnboundedSender<HttpContext>,
}

/// Client half of a [`ChannelListener`]
#[derive(Debug)]
pub struct ChannelClient {
    requests: mpsc::Sender<HttpContext>,
    responses: mpsc::UnboundedReceiver<HttpContext>,
}

impl ChannelListener {
    /// Create a listener and its client; `buffer` bounds pending requests
    pub fn pair(buffer: usize) -> (ChannelListener, ChannelClient) {
        let (request_tx, request_rx) = mpsc::channel(buffer.max(1));
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let listener = ChannelListener {
            requests: Mutex::new(request_rx),
            responses: response_tx,
        };
        let client = ChannelClient {
            requests: request_tx,
            responses: response_rx,
        };
        (listener, client)
    }
}

#[async_trait]
impl Listener for ChannelListener {
    async fn accept(&self) -> Option<HttpContext> {
        self.requests.lock().await.recv().await
    }

    async fn send(&self, context: HttpContext) {
        if self.responses.send(context).is_err() {
            tracing::debug!(target: "trellis::server", "Client went away before its response");
        }
    }
}

impl ChannelClient {
    /// Queue a request; fails with the context when the listener is gone
    pub async fn submit(&self, context: HttpContext) -> Result<(), HttpContext> {
        self.requests.send(context).await.map_err(|error| error.0)
    }

    /// Next answered context, in completion order
    pub async fn recv(&mut self) -> Option<HttpContext> {
        self.responses.recv().await
    }

    /// Submit one request and wait for the answer
    ///
    /// Only meaningful while this is the sole request in flight, since
    /// answers arrive in completion order.
    pub async fn request(&mut self, context: HttpContext) -> Option<HttpContext> {
        self.submit(context).await.ok()?;
        self.recv().await
    }

    /// Stop sending requests; the server's accept loop ends once drained
    pub fn close(self) -> mpsc::UnboundedReceiver<HttpContext> {
        self.responses
    }
}
