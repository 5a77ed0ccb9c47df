//! Backend-agnostic request.

use std::fmt;
use std::io;

use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use http::Method;

use crate::model::headers::{Headers, CONTENT_LENGTH, TRANSFER_ENCODING};
use crate::model::url::RequestUrl;

/// Request body.
#[derive(Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Body held in memory.
    Bytes(Bytes),
    /// Body produced lazily, with a length when the producer knows it.
    Stream {
        stream: BoxStream<'static, io::Result<Bytes>>,
        length: Option<u64>,
    },
}

impl RequestBody {
    /// Wrap a byte stream as a body.
    pub fn from_stream<S>(stream: S, length: Option<u64>) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        RequestBody::Stream {
            stream: stream.boxed(),
            length,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Empty => true,
            RequestBody::Bytes(b) => b.is_empty(),
            RequestBody::Stream { length, .. } => *length == Some(0),
        }
    }

    /// Length of the body when it is known without reading it.
    pub fn known_length(&self) -> Option<u64> {
        match self {
            RequestBody::Empty => Some(0),
            RequestBody::Bytes(b) => Some(b.len() as u64),
            RequestBody::Stream { length, .. } => *length,
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            RequestBody::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish_non_exhaustive()
            }
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        if b.is_empty() {
            RequestBody::Empty
        } else {
            RequestBody::Bytes(b)
        }
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        RequestBody::from(Bytes::from(v))
    }
}

impl From<&'static str> for RequestBody {
    fn from(s: &'static str) -> Self {
        RequestBody::from(Bytes::from_static(s.as_bytes()))
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::from(Bytes::from(s))
    }
}

/// A request as handed to a backend.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: RequestUrl,
    pub headers: Headers,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: RequestUrl) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: RequestBody::Empty,
        }
    }

    /// Start building a request for an absolute URL string.
    pub fn builder(method: Method, url: &str) -> HttpRequestBuilder {
        HttpRequestBuilder {
            method,
            url: RequestUrl::parse(url).map_err(|e| format!("{}: {}", url, e)),
            headers: Headers::new(),
            body: RequestBody::Empty,
        }
    }

    /// Content length from the `Content-Length` header, falling back to the
    /// body's own length when it is known.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
            .or_else(|| match &self.body {
                RequestBody::Empty => None,
                body => body.known_length(),
            })
    }

    /// Whether the request declares `Transfer-Encoding: chunked`.
    pub fn is_chunked(&self) -> bool {
        self.headers
            .get_all(TRANSFER_ENCODING)
            .iter()
            .flat_map(|v| v.split(','))
            .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
    }
}

/// Fluent builder for [`HttpRequest`].
pub struct HttpRequestBuilder {
    method: Method,
    url: Result<RequestUrl, String>,
    headers: Headers,
    body: RequestBody,
}

impl HttpRequestBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Finish the request. Fails when the URL did not parse.
    pub fn build(self) -> Result<HttpRequest, crate::BackendError> {
        let url = self.url.map_err(crate::BackendError::InvalidRequest)?;
        Ok(HttpRequest {
            method: self.method,
            url,
            headers: self.headers,
            body: self.body,
        })
    }
}
