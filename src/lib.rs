//! Pluggable HTTP client backend over hyper-util.
//!
//! A backend takes a backend-agnostic [`HttpRequest`], runs it on a pooled
//! hyper client and returns an [`HttpResponse`] as soon as the response head
//! arrives. The body keeps streaming through a push-to-pull bridge and is
//! read at the caller's pace.

pub mod backend;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod net;
pub mod observability;

pub use backend::{HttpClientBackend, HttpClientBackendFactory, HyperBackend};
pub use bridge::{BufferPolicy, ResponseBody};
pub use config::BackendConfig;
pub use error::{BackendError, BackendResult, StreamError, TransportError};
pub use model::{Headers, HttpRequest, HttpResponse, HttpStatus, ProtocolVersion, QueryParams, RequestBody, RequestUrl};
