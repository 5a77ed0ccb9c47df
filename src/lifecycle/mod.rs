//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (HyperBackend::new):
//!     BackendConfig → TLS context → connector → hyper client (+ hook) → Engine
//!
//! Shutdown (HyperBackend::close or drop):
//!     Shutdown::trigger → waiting executes fail with TransportError::Closed
//!                       → streaming bodies fail with StreamError::Closed
//! ```
//!
//! # Design Decisions
//! - The engine is built once and passed around explicitly; no global instance
//! - Close is idempotent and safe with requests in flight

pub mod shutdown;

pub use shutdown::Shutdown;
