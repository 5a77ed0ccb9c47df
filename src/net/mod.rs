//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Engine needs a connection for a URI
//!     → connector.rs (TCP connect with timeout)
//!     → tls.rs context (TLS handshake for https, ALPN h2/http1.1)
//!     → MaybeTlsStream handed to the hyper client pool
//! ```
//!
//! # Design Decisions
//! - TLS context is resolved once per backend
//! - Plain and TLS streams share one connection type so the pool stays uniform

pub mod connector;
pub mod tls;

pub use connector::{MaybeTlsStream, TlsConnector};
