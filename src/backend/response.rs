//! Engine response head → generic response builder.

use http::response::Parts;
use http::{HeaderName, HeaderValue, Version};
use hyper::ext::ReasonPhrase;

use crate::model::{HttpResponseBuilder, HttpStatus, ProtocolVersion};

/// Convert a response head. Body and timestamps are attached by the caller.
pub fn convert_response(parts: &Parts) -> HttpResponseBuilder {
    let code = parts.status.as_u16();
    // hyper only records a reason phrase that differs from the canonical one
    let status = match parts.extensions.get::<ReasonPhrase>() {
        Some(reason) => HttpStatus::new(code, String::from_utf8_lossy(reason.as_bytes())),
        None => HttpStatus::from_code(code),
    };

    let mut builder = HttpResponseBuilder::new(status).version(protocol_version(parts.version));
    for (name, value) in &parts.headers {
        builder = builder.header(name.as_str(), header_text(name, value));
    }
    builder
}

/// Header values are text; obs-text bytes become U+FFFD rather than dropping the header.
fn header_text(name: &HeaderName, value: &HeaderValue) -> String {
    match value.to_str() {
        Ok(text) => text.to_owned(),
        Err(_) => {
            tracing::debug!(header = %name, "Non-UTF-8 header value, decoded lossily");
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        }
    }
}

fn protocol_version(version: Version) -> ProtocolVersion {
    let (major, minor) = match version {
        Version::HTTP_09 => (0, 9),
        Version::HTTP_10 => (1, 0),
        Version::HTTP_2 => (2, 0),
        Version::HTTP_3 => (3, 0),
        _ => (1, 1),
    };
    ProtocolVersion::new("HTTP", major, minor)
}
