//! Transport request descriptor.

use std::time::Duration;

use axum::body::Body;
use http::header::{HeaderValue, CONTENT_LENGTH};
use http::{HeaderMap, Method, Uri};

use crate::config::BackendConfig;
use crate::model::RequestBody;

/// Per-request engine settings, copied from the backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSettings {
    pub follow_redirects: bool,
    /// Longest silence between body frames.
    pub socket_timeout: Option<Duration>,
    /// Enforced by the connector built from the same configuration.
    pub connect_timeout: Option<Duration>,
    /// Deadline for pool checkout, connect, send and response head.
    pub connection_request_timeout: Option<Duration>,
}

impl From<&BackendConfig> for RequestSettings {
    fn from(config: &BackendConfig) -> Self {
        Self {
            follow_redirects: config.follow_redirects,
            socket_timeout: config.socket_timeout(),
            connect_timeout: config.connect_timeout(),
            connection_request_timeout: config.connection_request_timeout(),
        }
    }
}

/// Request entity streamed to the engine.
#[derive(Debug)]
pub struct StreamEntity {
    /// Declared length; `None` when unknown.
    pub length: Option<u64>,
    /// Send with chunked transfer-encoding regardless of `length`.
    pub chunked: bool,
    pub body: RequestBody,
}

/// A request in the shape the engine consumes. Built once per call.
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub entity: Option<StreamEntity>,
    pub settings: RequestSettings,
}

impl TransportRequest {
    /// Lower into the request type the hyper client sends.
    ///
    /// A known length is sent as `Content-Length` unless the entity is chunked.
    pub fn into_http(self) -> http::Request<Body> {
        let mut headers = self.headers;
        let body = match self.entity {
            None => Body::empty(),
            Some(entity) => {
                if let (Some(length), false) = (entity.length, entity.chunked) {
                    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
                }
                engine_body(entity.body)
            }
        };

        let mut request = http::Request::new(body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = headers;
        request
    }
}

fn engine_body(body: RequestBody) -> Body {
    match body {
        RequestBody::Empty => Body::empty(),
        RequestBody::Bytes(bytes) => Body::from(bytes),
        RequestBody::Stream { stream, .. } => Body::from_stream(stream),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn descriptor(entity: Option<StreamEntity>) -> TransportRequest {
        TransportRequest {
            method: Method::POST,
            uri: "http://127.0.0.1:8080/upload".parse().unwrap(),
            headers: HeaderMap::new(),
            entity,
            settings: RequestSettings::from(&BackendConfig::default()),
        }
    }

    #[test]
    fn known_length_becomes_content_length() {
        let request = descriptor(Some(StreamEntity {
            length: Some(5),
            chunked: false,
            body: RequestBody::Bytes(Bytes::from_static(b"hello")),
        }))
        .into_http();
        assert_eq!(request.headers()[CONTENT_LENGTH], "5");
        assert_eq!(request.method(), Method::POST);
    }

    #[test]
    fn chunked_entity_has_no_content_length() {
        let request = descriptor(Some(StreamEntity {
            length: Some(5),
            chunked: true,
            body: RequestBody::Bytes(Bytes::from_static(b"hello")),
        }))
        .into_http();
        assert!(request.headers().get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn settings_follow_config() {
        let config = BackendConfig {
            follow_redirects: true,
            socket_timeout_ms: 0,
            ..BackendConfig::default()
        };
        let settings = RequestSettings::from(&config);
        assert!(settings.follow_redirects);
        assert_eq!(settings.socket_timeout, None);
        assert_eq!(settings.connect_timeout, Some(Duration::from_secs(10)));
    }
}
