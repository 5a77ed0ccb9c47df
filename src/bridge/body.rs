//! Pull side of the bridge: the response body.

use std::fmt;
use std::future::poll_fn;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use tokio::io::{AsyncRead, ReadBuf};

use crate::bridge::channel::Rx;
use crate::error::StreamError;

enum State {
    Open(Rx),
    Done,
    Failed(StreamError),
}

/// Lazily readable response body.
///
/// Yields chunks in the order the engine received them. After the end of
/// data every read returns `None`; after a failure every read returns the
/// same error.
///
/// Readable as a [`Stream`] of chunks, as an [`AsyncRead`], or through
/// [`chunk`](Self::chunk), [`bytes`](Self::bytes) and [`text`](Self::text).
pub struct ResponseBody {
    state: State,
    // unread remainder of a chunk partially consumed through AsyncRead
    pending: Bytes,
}

impl ResponseBody {
    pub(crate) fn from_rx(rx: Rx) -> Self {
        Self {
            state: State::Open(rx),
            pending: Bytes::new(),
        }
    }

    /// A body with no data.
    pub fn empty() -> Self {
        Self {
            state: State::Done,
            pending: Bytes::new(),
        }
    }

    /// Whether the end of data (or a failure) has been reached.
    pub fn is_terminated(&self) -> bool {
        self.pending.is_empty() && !matches!(self.state, State::Open(_))
    }

    /// Poll for the next chunk. Backs the `Stream` and `AsyncRead` impls;
    /// once a failure is seen it is returned again on every later poll.
    pub fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Bytes, StreamError>>> {
        if !self.pending.is_empty() {
            return Poll::Ready(Some(Ok(std::mem::take(&mut self.pending))));
        }

        let rx = match &mut self.state {
            State::Open(rx) => rx,
            State::Done => return Poll::Ready(None),
            State::Failed(err) => return Poll::Ready(Some(Err(err.clone()))),
        };

        if let Some(chunk) = ready!(rx.poll_data(cx)) {
            return Poll::Ready(Some(Ok(chunk)));
        }

        match rx.terminal() {
            Ok(()) => {
                self.state = State::Done;
                Poll::Ready(None)
            }
            Err(err) => {
                self.state = State::Failed(err.clone());
                Poll::Ready(Some(Err(err)))
            }
        }
    }

    /// Next chunk, or `None` at the end of data.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        poll_fn(|cx| self.poll_chunk(cx)).await.transpose()
    }

    /// Read the rest of the body into memory.
    pub async fn bytes(&mut self) -> Result<Bytes, StreamError> {
        let first = match self.chunk().await? {
            Some(chunk) => chunk,
            None => return Ok(Bytes::new()),
        };
        let second = match self.chunk().await? {
            Some(chunk) => chunk,
            None => return Ok(first),
        };

        let mut buf = BytesMut::with_capacity(first.len() + second.len());
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&second);
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }

    /// Read the rest of the body as UTF-8 text.
    pub async fn text(&mut self) -> Result<String, StreamError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| StreamError::InvalidUtf8)
    }
}

impl Stream for ResponseBody {
    type Item = Result<Bytes, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_chunk(cx)
    }
}

impl AsyncRead for ResponseBody {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        loop {
            if !this.pending.is_empty() {
                let n = buf.remaining().min(this.pending.len());
                buf.put_slice(&this.pending.split_to(n));
                return Poll::Ready(Ok(()));
            }

            match ready!(this.poll_chunk(cx)) {
                Some(Ok(chunk)) => this.pending = chunk,
                Some(Err(err)) => return Poll::Ready(Err(err.into())),
                None => return Poll::Ready(Ok(())),
            }
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            State::Open(_) => "open",
            State::Done => "done",
            State::Failed(_) => "failed",
        };
        f.debug_struct("ResponseBody")
            .field("state", &state)
            .field("pending", &self.pending.len())
            .finish()
    }
}
