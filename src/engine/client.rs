//! Pooled hyper client with deadlines, redirects and close.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use axum::body::Body;
use bytes::Bytes;
use http::response::Parts;
use http::Response;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tokio::sync::broadcast;

use crate::config::{BackendConfig, RequestHook};
use crate::engine::redirect::{self, MAX_REDIRECTS};
use crate::engine::timeouts::with_deadline;
use crate::engine::{BodyConsumer, TransportRequest};
use crate::error::{StreamError, TransportError};
use crate::lifecycle::Shutdown;
use crate::net::{tls, TlsConnector};
use crate::observability::metrics;

type HyperClient = Client<TlsConnector, Body>;

/// The transport engine behind a backend.
///
/// Owns the connection pool. After [`close`](Self::close) new requests fail
/// with [`TransportError::Closed`] and every body still streaming ends with
/// [`StreamError::Closed`].
pub struct Engine {
    client: Mutex<Option<HyperClient>>,
    customize_request: Option<RequestHook>,
    shutdown: Shutdown,
}

impl Engine {
    /// Build the engine for a configuration snapshot.
    pub fn new(config: &BackendConfig) -> Result<Self, TransportError> {
        let tls = tls::client_config(config)?;
        let connector = TlsConnector::new(tls, config.connect_timeout());

        let mut builder = Client::builder(TokioExecutor::new());
        builder.pool_timer(TokioTimer::new());
        if let Some(hook) = &config.customize_client {
            hook(&mut builder);
        }
        // The legacy client keeps no auth cache, cookie store or other
        // per-user state: nothing to disable here.
        let client = builder.build(connector);

        tracing::debug!(
            follow_redirects = config.follow_redirects,
            connect_timeout = ?config.connect_timeout(),
            "Transport engine started"
        );

        Ok(Self {
            client: Mutex::new(Some(client)),
            customize_request: config.customize_request.clone(),
            shutdown: Shutdown::new(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Release the pool and end all in-flight work. Idempotent.
    pub fn close(&self) {
        if !self.shutdown.trigger() {
            return;
        }
        let client = self.client.lock().unwrap_or_else(PoisonError::into_inner).take();
        drop(client);
        tracing::info!(in_flight = self.shutdown.receiver_count(), "Transport engine closed");
    }

    /// Send `request` and return the response head once it arrives.
    ///
    /// The body is pushed into `consumer` from a background task; the
    /// returned parts never wait for it.
    pub async fn execute<C: BodyConsumer>(
        &self,
        request: TransportRequest,
        consumer: C,
    ) -> Result<Parts, TransportError> {
        // Subscribe first so a close racing with this call is never missed.
        let mut shutdown = self.shutdown.subscribe();
        if self.shutdown.is_triggered() {
            return Err(TransportError::Closed);
        }
        let client = self.client()?;
        let settings = request.settings.clone();

        let response = tokio::select! {
            _ = shutdown.recv() => return Err(TransportError::Closed),
            response = with_deadline(
                settings.connection_request_timeout,
                self.send(&client, request),
                TransportError::Timeout,
            ) => response?,
        };

        let (parts, body) = response.into_parts();
        tokio::spawn(pump(body, consumer, settings.socket_timeout, shutdown));
        Ok(parts)
    }

    fn client(&self) -> Result<HyperClient, TransportError> {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TransportError::Closed)
    }

    async fn send(&self, client: &HyperClient, request: TransportRequest) -> Result<Response<Incoming>, TransportError> {
        let follow = request.settings.follow_redirects;
        let mut method = request.method.clone();
        let mut uri = request.uri.clone();
        let mut headers = redirect::follow_up_headers(&request.headers);

        let mut response = self.dispatch(client, request.into_http()).await?;
        if !follow {
            return Ok(response);
        }

        for hops in 0..=MAX_REDIRECTS {
            let Some(hop) = redirect::next_hop(&method, &uri, &response)? else {
                return Ok(response);
            };
            if hops == MAX_REDIRECTS {
                return Err(TransportError::TooManyRedirects(MAX_REDIRECTS));
            }
            tracing::debug!(status = %response.status(), location = %hop.uri, "Following redirect");
            // once stripped, credentials stay stripped for later hops
            redirect::remove_sensitive_headers(&mut headers, &hop.uri, &uri);

            response = self.dispatch(client, redirect::follow_up(&hop, &headers)).await?;
            method = hop.method;
            uri = hop.uri;
        }
        Err(TransportError::TooManyRedirects(MAX_REDIRECTS))
    }

    async fn dispatch(
        &self,
        client: &HyperClient,
        mut request: http::Request<Body>,
    ) -> Result<Response<Incoming>, TransportError> {
        if let Some(hook) = &self.customize_request {
            hook(&mut request);
        }
        Ok(client.request(request).await?)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.close();
    }
}

/// Push body frames into `consumer` until the body ends, fails, the reader
/// goes away or the engine closes.
async fn pump<C: BodyConsumer>(
    mut body: Incoming,
    mut consumer: C,
    socket_timeout: Option<Duration>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let outcome = loop {
        let frame = tokio::select! {
            _ = shutdown.recv() => break Err(StreamError::Closed),
            _ = consumer.closed() => {
                tracing::debug!("Response body dropped while waiting for data");
                return;
            }
            frame = with_deadline(socket_timeout, next_data(&mut body), StreamError::Timeout) => frame,
        };
        let chunk = match frame {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break Ok(()),
            Err(err) => break Err(err),
        };

        let delivered = tokio::select! {
            _ = shutdown.recv() => break Err(StreamError::Closed),
            delivered = consumer.consume(chunk) => delivered,
        };
        if !delivered {
            tracing::debug!("Response body abandoned by reader");
            return;
        }
    };

    if let Err(err) = &outcome {
        metrics::record_stream_error(err);
        tracing::debug!(error = %err, "Response body failed");
    }
    consumer.complete(outcome);
}

/// Next data frame; trailers are skipped.
async fn next_data(body: &mut Incoming) -> Result<Option<Bytes>, StreamError> {
    loop {
        match body.frame().await {
            None => return Ok(None),
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    return Ok(Some(data));
                }
            }
            Some(Err(err)) => return Err(StreamError::Engine(err.to_string())),
        }
    }
}
