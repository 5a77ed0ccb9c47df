//! Concurrency tests: many requests on one backend, slow readers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use http::Method;

use http_backend::backend::HttpClientBackendFactory;
use http_backend::{HttpRequest, HyperBackend};

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_backend() {
    let addr = common::start_hello_server().await;
    let backend = Arc::new(HyperBackend::create(|_| {}).unwrap());

    let concurrency = 20;
    let requests_per_task = 25;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let backend = backend.clone();
        let url = common::url(addr, "/hello");
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for _ in 0..requests_per_task {
                let request = HttpRequest::builder(Method::GET, &url).build().unwrap();
                let mut response = backend.execute(request).await.unwrap();
                if response.body.text().await.unwrap() == "Hello, client" {
                    ok += 1;
                }
            }
            ok
        }));
    }

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    assert_eq!(total, concurrency * requests_per_task);
    println!("{} requests in {:?}", total, start.elapsed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bounded_buffer_with_slow_reader() {
    let addr = common::start_hello_server().await;
    let backend = HyperBackend::create(|config| {
        config.max_buffered_chunks = Some(1);
        config.socket_timeout_ms = 2_000;
    })
    .unwrap();

    let request = HttpRequest::builder(Method::GET, &common::url(addr, "/large")).build().unwrap();
    let mut response = backend.execute(request).await.unwrap();

    let mut received = 0;
    while let Some(chunk) = response.body.chunk().await.unwrap() {
        assert!(chunk.iter().all(|b| *b == b'x'));
        received += chunk.len();
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(received, common::LARGE_BODY_LEN);
}

#[tokio::test]
async fn test_unread_bodies_do_not_block_new_requests() {
    let addr = common::start_hello_server().await;
    let backend = HyperBackend::create(|_| {}).unwrap();

    // keep responses alive without reading them
    let mut held = Vec::new();
    for _ in 0..10 {
        let request = HttpRequest::builder(Method::GET, &common::url(addr, "/large")).build().unwrap();
        held.push(backend.execute(request).await.unwrap());
    }

    let request = HttpRequest::builder(Method::GET, &common::url(addr, "/hello")).build().unwrap();
    let mut response = tokio::time::timeout(Duration::from_secs(5), backend.execute(request))
        .await
        .expect("new request blocked by unread bodies")
        .unwrap();
    assert_eq!(response.body.text().await.unwrap(), "Hello, client");
    drop(held);
}
