//! Chunk channel between the engine's body pump and the body reader.

use std::task::{Context, Poll};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::bridge::body::ResponseBody;
use crate::error::StreamError;

/// Memory policy for chunks that arrived but have not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPolicy {
    /// Never stall the producer; memory grows with a slow reader.
    #[default]
    Unbounded,
    /// Suspend the producer once this many chunks are queued.
    Bounded(usize),
}

impl BufferPolicy {
    /// Policy for an optional chunk limit (`None` = unbounded).
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(n) => BufferPolicy::Bounded(n),
            None => BufferPolicy::Unbounded,
        }
    }
}

enum DataTx {
    Unbounded(mpsc::UnboundedSender<Bytes>),
    Bounded(mpsc::Sender<Bytes>),
}

enum DataRx {
    Unbounded(mpsc::UnboundedReceiver<Bytes>),
    Bounded(mpsc::Receiver<Bytes>),
}

/// Consumer end of the channel, owned by [`ResponseBody`].
///
/// Data chunks arrive through the queue; the terminal marker (end or
/// failure) sits in its own slot and is only looked at once the queue is
/// closed and drained, so it never overtakes data and never waits behind a
/// full queue.
pub(crate) struct Rx {
    data: DataRx,
    terminal: oneshot::Receiver<Result<(), StreamError>>,
}

impl Rx {
    /// Next queued chunk; `None` once the producer is gone and the queue is empty.
    pub(crate) fn poll_data(&mut self, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        match &mut self.data {
            DataRx::Unbounded(rx) => rx.poll_recv(cx),
            DataRx::Bounded(rx) => rx.poll_recv(cx),
        }
    }

    /// How the producer terminated. Only meaningful after `poll_data` returned `None`.
    pub(crate) fn terminal(&mut self) -> Result<(), StreamError> {
        self.terminal.try_recv().unwrap_or(Err(StreamError::Interrupted))
    }
}

/// Create a chunk channel: the producer half for the engine, the consumer
/// half for the response.
pub fn channel(policy: BufferPolicy) -> (BodySender, ResponseBody) {
    let (tx, rx) = match policy {
        BufferPolicy::Unbounded => {
            let (tx, rx) = mpsc::unbounded_channel();
            (DataTx::Unbounded(tx), DataRx::Unbounded(rx))
        }
        BufferPolicy::Bounded(capacity) => {
            // tokio panics on a zero capacity
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (DataTx::Bounded(tx), DataRx::Bounded(rx))
        }
    };
    let (terminal_tx, terminal_rx) = oneshot::channel();

    let sender = BodySender {
        terminal: terminal_tx,
        data: tx,
        delivered: 0,
    };
    let rx = Rx {
        data: rx,
        terminal: terminal_rx,
    };
    (sender, ResponseBody::from_rx(rx))
}

/// Producer half of a chunk channel.
///
/// Terminating it (`finish` or `fail`) consumes the sender, so a channel is
/// terminated at most once. Dropping it without terminating makes the reader
/// fail with [`StreamError::Interrupted`] after the queued chunks.
pub struct BodySender {
    // declared before `data` so it is dropped first
    terminal: oneshot::Sender<Result<(), StreamError>>,
    data: DataTx,
    delivered: u64,
}

impl BodySender {
    /// Queue a chunk. Returns `false` once the reader is gone.
    ///
    /// Under a bounded policy this suspends while the queue is full.
    pub async fn send(&mut self, chunk: Bytes) -> bool {
        if chunk.is_empty() {
            return !self.is_closed();
        }
        let len = chunk.len() as u64;
        let accepted = match &self.data {
            DataTx::Unbounded(tx) => tx.send(chunk).is_ok(),
            DataTx::Bounded(tx) => tx.send(chunk).await.is_ok(),
        };
        if accepted {
            self.delivered += len;
        }
        accepted
    }

    /// Signal end of data.
    pub fn finish(self) {
        tracing::trace!(bytes = self.delivered, "Body complete");
        self.terminate(Ok(()));
    }

    /// Signal that the body failed after the chunks already sent.
    pub fn fail(self, err: StreamError) {
        tracing::debug!(bytes = self.delivered, error = %err, "Body failed");
        self.terminate(Err(err));
    }

    /// Whether the reader has been dropped.
    pub fn is_closed(&self) -> bool {
        match &self.data {
            DataTx::Unbounded(tx) => tx.is_closed(),
            DataTx::Bounded(tx) => tx.is_closed(),
        }
    }

    /// Resolves once the reader has been dropped.
    pub async fn closed(&self) {
        match &self.data {
            DataTx::Unbounded(tx) => tx.closed().await,
            DataTx::Bounded(tx) => tx.closed().await,
        }
    }

    /// Total bytes accepted so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    fn terminate(self, outcome: Result<(), StreamError>) {
        let BodySender { terminal, data, .. } = self;
        // the reader may already be gone
        let _ = terminal.send(outcome);
        drop(data);
    }
}
