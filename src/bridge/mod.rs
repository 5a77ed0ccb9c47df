//! Push-to-pull body bridge.
//!
//! # Data Flow
//! ```text
//! engine pump task (push, one call per received frame)
//!     → BodySender::send(chunk)        ─┐
//!     → BodySender::finish() | fail()   │ chunk channel (ordered queue)
//!                                       ▼
//! ResponseBody (pull, at the reader's pace)
//!     → chunk() / Stream / AsyncRead
//! ```
//!
//! # Design Decisions
//! - One channel per in-flight request, never shared
//! - End-of-data and failure are separate terminal markers
//! - A failure is only seen after every chunk queued before it
//! - Unbounded by default; `BufferPolicy::Bounded` trades throughput for memory

pub mod body;
pub mod channel;

pub use body::ResponseBody;
pub use channel::{channel, BodySender, BufferPolicy};
