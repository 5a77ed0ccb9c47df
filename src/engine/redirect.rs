//! Redirect following, when enabled.
//!
//! 301/302/307/308 are followed for GET and HEAD only; 303 is followed for
//! any method and re-issued as GET (HEAD stays HEAD). Follow-up requests
//! never carry an entity, and credentials are dropped once a hop leaves the
//! original origin.

use axum::body::Body;
use http::header::{
    AUTHORIZATION, CONTENT_LENGTH, COOKIE, HOST, LOCATION, PROXY_AUTHORIZATION, TRANSFER_ENCODING, WWW_AUTHENTICATE,
};
use http::{HeaderMap, Method, Response, Uri};
use url::Url;

use crate::error::TransportError;

/// Most redirects followed for one request.
pub const MAX_REDIRECTS: usize = 10;

/// Where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub method: Method,
    pub uri: Uri,
}

/// Decide whether `response` redirects, and where.
pub fn next_hop<B>(method: &Method, current: &Uri, response: &Response<B>) -> Result<Option<Hop>, TransportError> {
    let redirectable = *method == Method::GET || *method == Method::HEAD;
    let next_method = match response.status().as_u16() {
        301 | 302 | 307 | 308 if redirectable => method.clone(),
        303 if *method == Method::HEAD => Method::HEAD,
        303 => Method::GET,
        _ => return Ok(None),
    };

    let Some(location) = response.headers().get(LOCATION) else {
        return Ok(None);
    };
    let location = location
        .to_str()
        .map_err(|_| TransportError::InvalidRedirect("non-ASCII Location header".to_string()))?;

    let base = Url::parse(&current.to_string()).map_err(|e| TransportError::InvalidRedirect(e.to_string()))?;
    let mut target = base
        .join(location)
        .map_err(|e| TransportError::InvalidRedirect(format!("{}: {}", location, e)))?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(TransportError::InvalidRedirect(format!("unsupported scheme in {}", location)));
    }
    target.set_fragment(None);

    let uri = target
        .as_str()
        .parse()
        .map_err(|e| TransportError::InvalidRedirect(format!("{}: {}", location, e)))?;
    Ok(Some(Hop {
        method: next_method,
        uri,
    }))
}

/// Headers for follow-up requests: entity and host headers are dropped.
pub fn follow_up_headers(original: &HeaderMap) -> HeaderMap {
    let mut headers = original.clone();
    for name in [HOST, CONTENT_LENGTH, TRANSFER_ENCODING] {
        headers.remove(name);
    }
    headers
}

/// Strip credentials when `next` is on a different origin than `previous`.
///
/// Origins compare scheme, host and port (default ports filled in).
pub fn remove_sensitive_headers(headers: &mut HeaderMap, next: &Uri, previous: &Uri) {
    if origin(next) == origin(previous) {
        return;
    }
    for name in [AUTHORIZATION, PROXY_AUTHORIZATION, COOKIE, WWW_AUTHENTICATE] {
        headers.remove(name);
    }
    headers.remove("cookie2");
}

fn origin(uri: &Uri) -> (Option<&str>, Option<&str>, Option<u16>) {
    let scheme = uri.scheme_str();
    let port = uri.port_u16().or(match scheme {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    });
    (scheme, uri.host(), port)
}

/// Build the request for a hop.
pub fn follow_up(hop: &Hop, headers: &HeaderMap) -> http::Request<Body> {
    let mut request = http::Request::new(Body::empty());
    *request.method_mut() = hop.method.clone();
    *request.uri_mut() = hop.uri.clone();
    *request.headers_mut() = headers.clone();
    request
}
