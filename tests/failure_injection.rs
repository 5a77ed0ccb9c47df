//! Failure injection tests: refused connections, slow and truncated
//! responses, and closing the backend mid-flight.

use std::time::Duration;

use bytes::Bytes;
use http::Method;

use http_backend::backend::HttpClientBackendFactory;
use http_backend::error::{BackendError, StreamError, TransportError};
use http_backend::{HttpRequest, HyperBackend};

mod common;

fn get(url: &str) -> HttpRequest {
    HttpRequest::builder(Method::GET, url).build().unwrap()
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let addr = common::unused_addr().await;
    let backend = HyperBackend::create(|_| {}).unwrap();

    let err = backend.execute(get(&common::url(addr, "/"))).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(TransportError::Engine(_))), "{:?}", err);
}

#[tokio::test]
async fn test_missing_head_times_out() {
    // accepts and reads, never answers
    let addr = common::start_raw_backend(b"", Duration::from_secs(30)).await;
    let backend = HyperBackend::create(|config| config.connection_request_timeout_ms = 100).unwrap();

    let err = backend.execute(get(&common::url(addr, "/"))).await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::Transport(TransportError::Timeout(d)) if d == Duration::from_millis(100)
    ));
}

#[tokio::test]
async fn test_truncated_body_fails_after_delivered_bytes() {
    let addr = common::start_raw_backend(
        b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\npartial",
        Duration::from_millis(50),
    )
    .await;
    let backend = HyperBackend::create(|_| {}).unwrap();

    // the head was complete, so execute succeeds
    let mut response = backend.execute(get(&common::url(addr, "/"))).await.unwrap();
    assert_eq!(response.status.code, 200);

    let mut received = Vec::new();
    let err = loop {
        match response.body.chunk().await {
            Ok(Some(chunk)) => received.extend_from_slice(&chunk),
            Ok(None) => panic!("truncated body reported a clean end"),
            Err(err) => break err,
        }
    };
    assert_eq!(received, b"partial");
    assert!(matches!(err, StreamError::Engine(_)), "{:?}", err);

    // the failure sticks
    assert_eq!(response.body.chunk().await, Err(err));
}

#[tokio::test]
async fn test_silent_body_hits_socket_timeout() {
    let addr = common::start_raw_backend(
        b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n",
        Duration::from_secs(30),
    )
    .await;
    let backend = HyperBackend::create(|config| config.socket_timeout_ms = 100).unwrap();

    let mut response = backend.execute(get(&common::url(addr, "/"))).await.unwrap();
    let err = response.body.bytes().await.unwrap_err();
    assert_eq!(err, StreamError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn test_dropped_body_releases_connection() {
    let (addr, hung_up) =
        common::start_watched_backend(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nhalf").await;
    let backend = HyperBackend::create(|config| config.socket_timeout_ms = 0).unwrap();

    let mut response = backend.execute(get(&common::url(addr, "/"))).await.unwrap();
    assert_eq!(response.body.chunk().await, Ok(Some(Bytes::from_static(b"half"))));
    drop(response);

    // the server stays silent, so only the reader going away can end the pump
    tokio::time::timeout(Duration::from_secs(2), hung_up)
        .await
        .expect("connection still open after the body was dropped")
        .unwrap();
}

#[tokio::test]
async fn test_close_unblocks_pending_read() {
    let addr = common::start_raw_backend(
        b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nhalf",
        Duration::from_secs(30),
    )
    .await;
    let backend = HyperBackend::create(|config| config.socket_timeout_ms = 0).unwrap();

    let mut response = backend.execute(get(&common::url(addr, "/"))).await.unwrap();
    let reader = tokio::spawn(async move { response.body.bytes().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    backend.close();
    backend.close();

    let result = tokio::time::timeout(Duration::from_secs(5), reader)
        .await
        .expect("read still pending after close")
        .unwrap();
    assert_eq!(result, Err(StreamError::Closed));
}

#[tokio::test]
async fn test_drop_behaves_like_close() {
    let addr = common::start_raw_backend(
        b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n",
        Duration::from_secs(30),
    )
    .await;
    let backend = HyperBackend::create(|config| config.socket_timeout_ms = 0).unwrap();

    let mut response = backend.execute(get(&common::url(addr, "/"))).await.unwrap();
    drop(backend);

    let result = tokio::time::timeout(Duration::from_secs(5), response.body.chunk())
        .await
        .expect("read still pending after drop");
    assert_eq!(result, Err(StreamError::Closed));
}

#[tokio::test]
async fn test_execute_after_close_fails() {
    let addr = common::start_hello_server().await;
    let backend = HyperBackend::create(|_| {}).unwrap();
    backend.close();

    let err = backend.execute(get(&common::url(addr, "/hello"))).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(TransportError::Closed)));
}

#[tokio::test]
async fn test_close_during_head_wait() {
    let addr = common::start_raw_backend(b"", Duration::from_secs(30)).await;
    let backend = std::sync::Arc::new(HyperBackend::create(|config| config.connection_request_timeout_ms = 0).unwrap());

    let pending = {
        let backend = backend.clone();
        tokio::spawn(async move { backend.execute(get(&common::url(addr, "/"))).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    backend.close();

    let result = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("execute still pending after close")
        .unwrap();
    assert!(matches!(result, Err(BackendError::Transport(TransportError::Closed))));
}
