//! Transport engine subsystem.
//!
//! # Data Flow
//! ```text
//! TransportRequest
//!     → client.rs (pool checkout, send, redirects, response head)
//!     → response parts returned to the caller
//!     → pump task: body frames → BodyConsumer (until end, failure or close)
//! ```
//!
//! # Design Decisions
//! - hyper-util's pooled client does the HTTP work; this layer adds
//!   deadlines, redirects and close semantics
//! - The body is pushed to a consumer from a spawned task, one per response

pub mod client;
pub mod redirect;
pub mod request;
pub mod timeouts;

use std::future::Future;

use bytes::Bytes;

use crate::bridge::BodySender;
use crate::error::StreamError;

pub use client::Engine;
pub use request::{RequestSettings, StreamEntity, TransportRequest};

/// Push-style receiver of a response body.
///
/// The engine calls `consume` once per chunk, in order, and then `complete`
/// exactly once, unless `consume` reported that nobody is reading anymore.
pub trait BodyConsumer: Send + Sized + 'static {
    /// Deliver one chunk. Resolves to `false` when the reader is gone.
    fn consume(&mut self, chunk: Bytes) -> impl Future<Output = bool> + Send;

    /// End of data (`Ok`) or the failure that ended it.
    fn complete(self, outcome: Result<(), StreamError>);

    /// Resolves once nobody is reading anymore. Never resolves by default.
    fn closed(&self) -> impl Future<Output = ()> + Send {
        std::future::pending()
    }
}

impl BodyConsumer for BodySender {
    fn consume(&mut self, chunk: Bytes) -> impl Future<Output = bool> + Send {
        self.send(chunk)
    }

    fn complete(self, outcome: Result<(), StreamError>) {
        match outcome {
            Ok(()) => self.finish(),
            Err(err) => self.fail(err),
        }
    }

    fn closed(&self) -> impl Future<Output = ()> + Send {
        BodySender::closed(self)
    }
}
