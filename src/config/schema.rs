//! Configuration schema definitions.
//!
//! The serializable part of [`BackendConfig`] can be read from a TOML file;
//! the TLS context and the customization hooks are set in code.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bridge::BufferPolicy;

/// Hook applied to the engine's client builder at construction.
pub type ClientHook = Arc<dyn Fn(&mut hyper_util::client::legacy::Builder) + Send + Sync>;

/// Hook applied to every engine request right before dispatch.
pub type RequestHook = Arc<dyn Fn(&mut http::Request<axum::body::Body>) + Send + Sync>;

/// Backend configuration, snapshotted when the backend is built.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Let the engine follow redirects.
    pub follow_redirects: bool,

    /// Maximum silence between body frames in milliseconds (0 = none).
    pub socket_timeout_ms: u64,

    /// TCP connect timeout in milliseconds (0 = none).
    pub connect_timeout_ms: u64,

    /// Time allowed to obtain a connection, send the request and receive the
    /// response head, in milliseconds (0 = none).
    pub connection_request_timeout_ms: u64,

    /// Chunks a response may queue ahead of its reader (unset = unbounded).
    pub max_buffered_chunks: Option<usize>,

    /// Trust roots loaded from disk when no `ssl_context` is set.
    pub tls: Option<TlsConfig>,

    /// Complete TLS client context; takes precedence over `tls`.
    #[serde(skip)]
    pub ssl_context: Option<Arc<rustls::ClientConfig>>,

    #[serde(skip)]
    pub customize_client: Option<ClientHook>,

    #[serde(skip)]
    pub customize_request: Option<RequestHook>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            follow_redirects: false,
            socket_timeout_ms: 10_000,
            connect_timeout_ms: 10_000,
            connection_request_timeout_ms: 20_000,
            max_buffered_chunks: None,
            tls: None,
            ssl_context: None,
            customize_client: None,
            customize_request: None,
        }
    }
}

impl BackendConfig {
    pub fn socket_timeout(&self) -> Option<Duration> {
        millis(self.socket_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn connection_request_timeout(&self) -> Option<Duration> {
        millis(self.connection_request_timeout_ms)
    }

    pub fn buffer_policy(&self) -> BufferPolicy {
        BufferPolicy::from_limit(self.max_buffered_chunks)
    }

    /// Register a hook on the engine's client builder.
    pub fn customize_client<F>(&mut self, hook: F)
    where
        F: Fn(&mut hyper_util::client::legacy::Builder) + Send + Sync + 'static,
    {
        self.customize_client = Some(Arc::new(hook));
    }

    /// Register a hook on every outgoing engine request.
    pub fn customize_request<F>(&mut self, hook: F)
    where
        F: Fn(&mut http::Request<axum::body::Body>) + Send + Sync + 'static,
    {
        self.customize_request = Some(Arc::new(hook));
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("follow_redirects", &self.follow_redirects)
            .field("socket_timeout_ms", &self.socket_timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("connection_request_timeout_ms", &self.connection_request_timeout_ms)
            .field("max_buffered_chunks", &self.max_buffered_chunks)
            .field("tls", &self.tls)
            .field("ssl_context", &self.ssl_context.is_some())
            .field("customize_client", &self.customize_client.is_some())
            .field("customize_request", &self.customize_request.is_some())
            .finish()
    }
}

/// TLS trust configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// PEM bundle of additional trusted CA certificates.
    pub ca_cert_path: String,

    /// Also trust the bundled web PKI roots.
    #[serde(default = "default_true")]
    pub include_webpki_roots: bool,
}

fn default_true() -> bool {
    true
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
