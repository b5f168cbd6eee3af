//! Request dispatch on top of a pluggable listener
//!
//! The routing core has no transport. A [`Listener`] hands over accepted
//! requests as contexts and takes answered contexts back; [`RestServer`]
//! routes each one on the tokio blocking pool.

pub mod listener;
pub mod server;

pub use listener::{ChannelClient, ChannelListener, Listener};
pub use server::{dispatch, RestServer};
