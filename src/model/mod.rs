//! Generic HTTP model shared by every backend.
//!
//! # Data Flow
//! ```text
//! caller builds HttpRequest (RequestUrl + Headers + RequestBody)
//!     → backend converts and executes it
//!     → HttpResponseBuilder (status, version, headers)
//!     → HttpResponse (+ timestamps, streaming ResponseBody)
//! ```
//!
//! # Design Decisions
//! - Header names are case-insensitive and keep insertion order
//! - A present-but-empty query string is distinct from no query string
//! - The response body is a stream, never a buffer

pub mod headers;
pub mod request;
pub mod response;
pub mod url;

pub use headers::{Headers, CONTENT_LENGTH, TRANSFER_ENCODING};
pub use request::{HttpRequest, HttpRequestBuilder, RequestBody};
pub use response::{HttpResponse, HttpResponseBuilder, HttpStatus, ProtocolVersion, ResponseHead};
pub use url::{QueryParams, RequestUrl};
