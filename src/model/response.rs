//! Backend-agnostic response.

use std::fmt;
use std::time::SystemTime;

use serde::Serialize;

use crate::bridge::ResponseBody;
use crate::model::headers::Headers;

/// Status code with its reason phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpStatus {
    pub code: u16,
    pub description: String,
}

impl HttpStatus {
    pub fn new(code: u16, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// Status with the canonical reason phrase for `code`.
    pub fn from_code(code: u16) -> Self {
        let description = http::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status Code");
        Self::new(code, description)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.description)
    }
}

/// Protocol name and version, e.g. `HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion {
    pub name: String,
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub fn new(name: impl Into<String>, major: u8, minor: u8) -> Self {
        Self {
            name: name.into(),
            major,
            minor,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.name, self.major, self.minor)
    }
}

/// A response whose body may still be arriving.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: HttpStatus,
    pub version: ProtocolVersion,
    pub headers: Headers,
    /// When the request was handed to the engine.
    pub request_time: SystemTime,
    /// When status and headers became available.
    pub response_time: SystemTime,
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Status, version and headers, without the body.
    pub fn head(&self) -> ResponseHead<'_> {
        ResponseHead {
            status: &self.status,
            version: &self.version,
            headers: &self.headers,
        }
    }
}

/// Serializable view of a response head.
#[derive(Debug, Serialize)]
pub struct ResponseHead<'a> {
    pub status: &'a HttpStatus,
    pub version: &'a ProtocolVersion,
    pub headers: &'a Headers,
}

/// Assembles an [`HttpResponse`].
#[derive(Debug)]
pub struct HttpResponseBuilder {
    pub status: HttpStatus,
    pub version: ProtocolVersion,
    pub headers: Headers,
    pub request_time: Option<SystemTime>,
    pub response_time: Option<SystemTime>,
    pub body: Option<ResponseBody>,
}

impl HttpResponseBuilder {
    pub fn new(status: HttpStatus) -> Self {
        Self {
            status,
            version: ProtocolVersion::new("HTTP", 1, 1),
            headers: Headers::new(),
            request_time: None,
            response_time: None,
            body: None,
        }
    }

    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn request_time(mut self, time: SystemTime) -> Self {
        self.request_time = Some(time);
        self
    }

    pub fn response_time(mut self, time: SystemTime) -> Self {
        self.response_time = Some(time);
        self
    }

    pub fn body(mut self, body: ResponseBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Finish the response. Missing timestamps default to now and a missing
    /// body to an empty one.
    pub fn build(self) -> HttpResponse {
        let now = SystemTime::now();
        HttpResponse {
            status: self.status,
            version: self.version,
            headers: self.headers,
            request_time: self.request_time.unwrap_or(now),
            response_time: self.response_time.unwrap_or(now),
            body: self.body.unwrap_or_else(ResponseBody::empty),
        }
    }
}
