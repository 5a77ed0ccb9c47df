//! Backend subsystem.
//!
//! # Data Flow
//! ```text
//! HttpRequest
//!     → request.rs (convert: URI, headers, entity, settings)
//!     → engine (send, wait for head; body pumped into a bridge channel)
//!     → response.rs (convert head: status, version, headers)
//!     → HttpResponse (+ timestamps, ResponseBody still streaming)
//! ```
//!
//! # Design Decisions
//! - Backends are explicit handles built by a factory; no global instance
//! - `execute` returns at head arrival, never after the body
//! - Conversion errors are raised before any network activity

pub mod adapter;
pub mod request;
pub mod response;

use std::future::Future;

use crate::error::BackendResult;
use crate::model::{HttpRequest, HttpResponse};

pub use adapter::HyperBackend;
pub use request::convert_request;
pub use response::convert_response;

/// A pluggable HTTP client backend.
pub trait HttpClientBackend: Send + Sync {
    /// Execute one request. Concurrent calls are independent.
    fn execute(&self, request: HttpRequest) -> impl Future<Output = BackendResult<HttpResponse>> + Send;

    /// Release the backend's resources. Idempotent; safe with requests in flight.
    fn close(&self);
}

/// Builds backends from a configuration-mutation function.
pub trait HttpClientBackendFactory {
    type Config: Default;
    type Backend: HttpClientBackend;

    /// Start from the default configuration, apply `configure`, build.
    fn create<F>(configure: F) -> BackendResult<Self::Backend>
    where
        F: FnOnce(&mut Self::Config);
}
