//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! backend / engine produce:
//!     → logging.rs (structured log events, one span per request id)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr
//!     → Prometheus scrape endpoint (opt-in)
//! ```
//!
//! # Design Decisions
//! - Every `execute` runs in a span carrying a UUID request id
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;
