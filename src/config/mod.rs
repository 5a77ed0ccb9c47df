//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BackendConfig (+ TLS context and hooks set in code)
//!     → snapshotted by the backend at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the backend is built; no per-request overrides
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BackendConfig, ClientHook, RequestHook, TlsConfig};
