//! Shared mock servers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::RawQuery;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const LARGE_BODY_LEN: usize = 1 << 20;

/// Start the `/hello` test server on an ephemeral port.
///
/// - `GET /hello` → `Hello, client`
/// - `POST /hello` → `Hello, client` if the body is exactly `Hello, server`, else 400
/// - `POST /echo` → the request body
/// - `GET /query` → `Debug` rendering of the raw query (`None`, `Some("")`, ...)
/// - `GET /hook` → value of the `x-hook` request header
/// - `GET /found` → 302 to `/hello`; `POST /see-other` → 303 to `/hello`
/// - `GET /loop` → 307 to itself
/// - `GET /same-origin` → 302 to `/credentials`
/// - `GET /cross-origin` → 302 to `/credentials` on `localhost` at the same port
/// - `GET /credentials` → `authorization=<value>;cookie=<value>` as received
/// - `GET /large` → [`LARGE_BODY_LEN`] bytes of `x`
pub async fn start_hello_server() -> SocketAddr {
    let app = Router::new()
        .route("/hello", get(|| async { "Hello, client" }).post(post_hello))
        .route("/echo", post(|body: Bytes| async move { body }))
        .route("/query", get(|RawQuery(query): RawQuery| async move { format!("{:?}", query) }))
        .route("/hook", get(hook_header))
        .route("/found", get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/hello")]) }))
        .route("/see-other", post(|| async { Redirect::to("/hello") }))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/same-origin", get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/credentials")]) }))
        .route("/cross-origin", get(cross_origin))
        .route("/credentials", get(credentials))
        .route("/large", get(|| async { vec![b'x'; LARGE_BODY_LEN] }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn post_hello(body: String) -> (StatusCode, &'static str) {
    if body == "Hello, server" {
        (StatusCode::OK, "Hello, client")
    } else {
        (StatusCode::BAD_REQUEST, "unexpected body")
    }
}

async fn hook_header(headers: HeaderMap) -> String {
    headers
        .get("x-hook")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn cross_origin(headers: HeaderMap) -> (StatusCode, [(header::HeaderName, String); 1]) {
    let port = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|host| host.rsplit_once(':'))
        .map(|(_, port)| port.to_string())
        .unwrap_or_default();
    let location = format!("http://localhost:{}/credentials", port);
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

async fn credentials(headers: HeaderMap) -> String {
    let value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };
    format!("authorization={};cookie={}", value(header::AUTHORIZATION), value(header::COOKIE))
}

/// Start a raw TCP backend that answers every connection with `response`
/// verbatim, keeps the socket open for `hold`, then closes it.
///
/// Used for responses an HTTP framework would refuse to produce: custom
/// reason phrases, truncated bodies, heads without bodies.
pub async fn start_raw_backend(response: &'static [u8], hold: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response).await;
                        tokio::time::sleep(hold).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Serve one connection with `response`, then report when the client hangs up.
pub async fn start_watched_backend(response: &'static [u8]) -> (SocketAddr, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (hung_up, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket.write_all(response).await;
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
        let _ = hung_up.send(());
    });
    (addr, rx)
}

/// An address nobody listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}
