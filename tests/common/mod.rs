//! Shared utilities for integration testing.

// Each integration test binary compiles this module separately and
// uses a different subset of it.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::IntoResponse;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use isorender::render::{RenderError, RenderReply, RenderRequest, Renderer};
use isorender::{RenderConfig, RenderMiddleware, RouteConfig};

/// A render engine driven by a closure, with an invocation counter.
pub struct ScriptedRenderer<F> {
    script: F,
    calls: AtomicU32,
}

impl<F, Fut> ScriptedRenderer<F>
where
    F: Fn(RenderRequest) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<RenderReply, RenderError>> + Send + 'static,
{
    pub fn new(script: F) -> Arc<Self> {
        Arc::new(Self { script, calls: AtomicU32::new(0) })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F, Fut> Renderer for ScriptedRenderer<F>
where
    F: Fn(RenderRequest) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<RenderReply, RenderError>> + Send + 'static,
{
    async fn render(&self, request: RenderRequest) -> Result<RenderReply, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(request).await
    }
}

/// The route table used across the integration tests.
pub fn demo_config() -> RenderConfig {
    RenderConfig {
        routes: vec![
            RouteConfig::new("home", "/", "Home"),
            RouteConfig::new("profile", "/profile/{id}", "Profile"),
        ],
        ..RenderConfig::default()
    }
}

/// Attach `middleware` over an inner service that counts how many
/// requests fall through to it.
pub fn app_with_fallthrough(middleware: RenderMiddleware) -> (Router, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let inner = Router::new().fallback(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            "fallthrough".into_response()
        }
    });
    (middleware.attach(inner), hits)
}

/// Start a one-shot raw-TCP backend that captures the request head and
/// replies with a small JSON body. Returns the bound address and a
/// receiver for the captured head.
pub async fn start_capture_backend() -> (std::net::SocketAddr, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let mut head = String::new();
            loop {
                let n = match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => n,
                };
                head.push_str(&String::from_utf8_lossy(&buf[..n]));
                if head.contains("\r\n\r\n") {
                    break;
                }
            }

            let body = r#"{"ok":true}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            let _ = tx.send(head).await;
        }
    });

    (addr, rx)
}
