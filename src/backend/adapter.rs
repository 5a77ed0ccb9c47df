//! Backend over the hyper-util engine.

use std::time::{Instant, SystemTime};

use tracing::Instrument;
use uuid::Uuid;

use crate::backend::request::convert_request;
use crate::backend::response::convert_response;
use crate::backend::{HttpClientBackend, HttpClientBackendFactory};
use crate::bridge;
use crate::config::BackendConfig;
use crate::engine::Engine;
use crate::error::BackendResult;
use crate::model::{HttpRequest, HttpResponse};
use crate::observability::metrics;

/// HTTP client backend that runs requests on a pooled hyper client.
///
/// The configuration is a snapshot taken at construction. Dropping the
/// backend closes it.
pub struct HyperBackend {
    engine: Engine,
    config: BackendConfig,
}

impl HyperBackend {
    /// Build the engine for `config`. Ready to use on return.
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let engine = Engine::new(&config)?;
        Ok(Self { engine, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.engine.is_closed()
    }

    /// Release the engine. In-flight bodies fail with `StreamError::Closed`.
    pub fn close(&self) {
        self.engine.close();
    }

    /// Execute `request`, returning as soon as the response head is known.
    ///
    /// The body keeps streaming in the background; failures after the head
    /// surface when it is read.
    pub async fn execute(&self, request: HttpRequest) -> BackendResult<HttpResponse> {
        let span = tracing::info_span!(
            "execute",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            url = %request.url,
        );
        self.execute_inner(request).instrument(span).await
    }

    async fn execute_inner(&self, request: HttpRequest) -> BackendResult<HttpResponse> {
        let method = request.method.to_string();
        let transport = convert_request(request, &self.config)?;
        let (sender, body) = bridge::channel(self.config.buffer_policy());

        let started = Instant::now();
        let request_time = SystemTime::now();
        let parts = match self.engine.execute(transport, sender).await {
            Ok(parts) => parts,
            Err(err) => {
                metrics::record_transport_error(&method);
                tracing::warn!(error = %err, "Request failed before response head");
                return Err(err.into());
            }
        };
        let response_time = SystemTime::now();

        metrics::record_response(&method, parts.status.as_u16(), started);
        tracing::debug!(status = %parts.status, elapsed = ?started.elapsed(), "Response head received");

        Ok(convert_response(&parts)
            .request_time(request_time)
            .response_time(response_time)
            .body(body)
            .build())
    }
}

impl HttpClientBackend for HyperBackend {
    fn execute(&self, request: HttpRequest) -> impl std::future::Future<Output = BackendResult<HttpResponse>> + Send {
        HyperBackend::execute(self, request)
    }

    fn close(&self) {
        HyperBackend::close(self);
    }
}

impl HttpClientBackendFactory for HyperBackend {
    type Config = BackendConfig;
    type Backend = HyperBackend;

    fn create<F>(configure: F) -> BackendResult<HyperBackend>
    where
        F: FnOnce(&mut BackendConfig),
    {
        let mut config = BackendConfig::default();
        configure(&mut config);
        tracing::debug!(config = ?config, "Creating hyper backend");
        HyperBackend::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, TransportError};
    use http::Method;

    #[tokio::test]
    async fn create_applies_configuration() {
        let backend = HyperBackend::create(|config| {
            config.follow_redirects = true;
            config.socket_timeout_ms = 1_500;
        })
        .unwrap();
        assert!(backend.config().follow_redirects);
        assert_eq!(backend.config().socket_timeout_ms, 1_500);
        assert!(!backend.is_closed());
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_engine() {
        let backend = HyperBackend::new(BackendConfig::default()).unwrap();
        backend.close();

        // conversion fails first, even on a closed backend
        let mut request = HttpRequest::builder(Method::GET, "http://localhost/").build().unwrap();
        request.headers.append("bad header", "x");
        let err = backend.execute(request).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidRequest(_)));

        let request = HttpRequest::builder(Method::GET, "http://localhost/").build().unwrap();
        let err = backend.execute(request).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(TransportError::Closed)));
    }

    #[tokio::test]
    async fn missing_ca_file_fails_creation() {
        let result = HyperBackend::create(|config| {
            config.tls = Some(crate::config::TlsConfig {
                ca_cert_path: "/nonexistent/ca.pem".to_string(),
                include_webpki_roots: true,
            });
        });
        assert!(matches!(result, Err(BackendError::Transport(TransportError::Tls(_)))));
    }
}
