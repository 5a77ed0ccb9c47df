//! Error taxonomy for the backend.
//!
//! # Design Decisions
//! - `InvalidRequest` is raised before anything touches the network
//! - `TransportError` is the result of `execute` when no response head arrived
//! - `StreamError` only ever surfaces while reading a response body
//! - Nothing here is retried

use std::time::Duration;
use thiserror::Error;

/// Errors returned by `execute`.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be converted (bad URL, header name or value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The engine failed before response status and headers were known.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures of the transport engine before the response head arrived.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, protocol error, etc.
    #[error("Transport engine error: {0}")]
    Engine(#[from] hyper_util::client::legacy::Error),

    /// No response head within the connection-request timeout.
    #[error("No response head after {0:?}")]
    Timeout(Duration),

    /// TLS setup failed while building the engine.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The backend was closed.
    #[error("Backend is closed")]
    Closed,

    /// The redirect limit was exceeded.
    #[error("Exceeded {0} redirects")]
    TooManyRedirects(usize),

    /// A redirect response carried an unusable Location.
    #[error("Invalid redirect location: {0}")]
    InvalidRedirect(String),
}

/// Failures discovered while reading a response body.
///
/// Bytes delivered before the error stay delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// No body frame within the socket timeout.
    #[error("No body data after {0:?}")]
    Timeout(Duration),

    /// The engine reported an error mid-body.
    #[error("Body transfer failed: {0}")]
    Engine(String),

    /// The backend was closed while the body was streaming.
    #[error("Backend closed while the body was streaming")]
    Closed,

    /// The producer went away without signalling end of data.
    #[error("Body stream interrupted")]
    Interrupted,

    /// `text()` was called on a body that is not UTF-8.
    #[error("Body is not valid UTF-8")]
    InvalidUtf8,
}

impl From<StreamError> for std::io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match err {
            StreamError::Timeout(_) => std::io::ErrorKind::TimedOut,
            StreamError::InvalidUtf8 => std::io::ErrorKind::InvalidData,
            StreamError::Interrupted | StreamError::Closed => std::io::ErrorKind::UnexpectedEof,
            StreamError::Engine(_) => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::InvalidRequest("bad host".into());
        assert_eq!(err.to_string(), "Invalid request: bad host");

        let err = BackendError::from(TransportError::Timeout(Duration::from_secs(2)));
        assert_eq!(err.to_string(), "No response head after 2s");
    }

    #[test]
    fn test_stream_error_into_io() {
        let io: std::io::Error = StreamError::Timeout(Duration::from_millis(5)).into();
        assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);

        let io: std::io::Error = StreamError::Closed.into();
        assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
