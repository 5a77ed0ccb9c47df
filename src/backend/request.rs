//! Generic request → transport request descriptor.

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Uri};
use url::Url;

use crate::config::BackendConfig;
use crate::engine::{RequestSettings, StreamEntity, TransportRequest};
use crate::error::{BackendError, BackendResult};
use crate::model::{Headers, HttpRequest, RequestUrl, CONTENT_LENGTH};

/// Convert `request` into the shape the engine sends.
///
/// Fails with [`BackendError::InvalidRequest`] before anything touches the
/// network when the URL, a header name or a header value is malformed.
pub fn convert_request(request: HttpRequest, config: &BackendConfig) -> BackendResult<TransportRequest> {
    let uri = build_uri(&request.url)?;
    let headers = copy_headers(&request.headers)?;

    let entity = if request.body.is_empty() {
        None
    } else {
        Some(StreamEntity {
            length: request.content_length(),
            chunked: request.is_chunked(),
            body: request.body,
        })
    };

    Ok(TransportRequest {
        method: request.method,
        uri,
        headers,
        entity,
        settings: RequestSettings::from(config),
    })
}

fn build_uri(url: &RequestUrl) -> BackendResult<Uri> {
    let scheme = url.scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme)));
    }
    if url.host.is_empty() {
        return Err(invalid("empty host".to_string()));
    }

    let host = if url.host.contains(':') && !url.host.starts_with('[') {
        format!("[{}]", url.host)
    } else {
        url.host.clone()
    };
    let mut target =
        Url::parse(&format!("{}://{}", scheme, host)).map_err(|e| invalid(format!("host {:?}: {}", url.host, e)))?;
    target
        .set_port(Some(url.port))
        .map_err(|_| invalid(format!("port {} on {:?}", url.port, url.host)))?;
    target.set_path(&url.path);

    match &url.query {
        None => target.set_query(None),
        // keep the trailing `?`
        Some(query) if query.is_empty() => target.set_query(Some("")),
        Some(query) => {
            target.query_pairs_mut().clear().extend_pairs(query.flatten());
        }
    }

    target
        .as_str()
        .parse()
        .map_err(|e| invalid(format!("{}: {}", target, e)))
}

fn copy_headers(headers: &Headers) -> BackendResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.flatten() {
        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            continue;
        }
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid(format!("header name {:?}", name)))?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid(format!("value of header {}", name)))?;
        map.append(name, value);
    }
    Ok(map)
}

fn invalid(message: String) -> BackendError {
    BackendError::InvalidRequest(message)
}
