//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use visitor_slo::backends::Backends;
use visitor_slo::config::{AgentConfig, ServiceConfig};
use visitor_slo::counter::{CounterStore, InMemoryStore, StoreError, StoredItem};
use visitor_slo::{HttpServer, Shutdown};

/// Start the counter service on an ephemeral port.
pub async fn start_counter_service(backends: Backends) -> (SocketAddr, Shutdown) {
    let mut config = ServiceConfig::default();
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, backends);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Start a programmable raw-TCP backend returning `(status, body)` per request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A backend that accepts connections, reads the request and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Agent settings for fast tests.
pub fn agent_config(target: SocketAddr) -> AgentConfig {
    AgentConfig {
        target_url: format!("http://{}", target),
        interval_ms: 1,
        request_timeout_ms: 500,
        ..AgentConfig::default()
    }
}

/// Store wrapper whose adds and reads can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub fail_adds: AtomicBool,
    pub fail_reads: AtomicBool,
    pub adds: AtomicUsize,
}

#[async_trait]
impl CounterStore for FlakyStore {
    async fn atomic_add(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        if self.fail_adds.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected".into()));
        }
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.inner.atomic_add(key, field, delta).await
    }

    async fn get(&self, key: &str) -> Result<Option<StoredItem>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Malformed("injected".into()));
        }
        self.inner.get(key).await
    }
}

pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
