//! End-to-end header forwarding: a data fetch issued during a render
//! must look, to the downstream service, like the browser's own call.

mod common;

use axum::body::Body;
use axum::http::Request;

use isorender::{FetchRequest, RequestContext};

#[tokio::test]
async fn forwarded_fetch_reaches_the_backend_with_browser_headers() {
    let (addr, mut captured) = common::start_capture_backend().await;

    // The inbound browser request this render is scoped to. Its host
    // points at the backend so the relative fetch resolves there.
    let (parts, _) = Request::builder()
        .uri("/profile/7")
        .header("host", addr.to_string())
        .header("cookie", "sid=abc")
        .header("x-tenant", "acme")
        .header("accept-encoding", "gzip")
        .header("accept", "text/html")
        .body(Body::empty())
        .unwrap()
        .into_parts();

    let context = RequestContext::from_parts(&parts, isorender::fetch::default_client());
    let response = context
        .fetcher()
        .send(FetchRequest::get("/api/data").header("x-caller", "1"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["ok"], true);

    let head = captured.recv().await.unwrap();
    let first_line = head.lines().next().unwrap_or_default();
    assert!(
        first_line.starts_with("GET /api/data"),
        "unexpected request line: {first_line}"
    );

    let head_lower = head.to_lowercase();
    assert!(head_lower.contains("cookie: sid=abc"));
    assert!(head_lower.contains("x-tenant: acme"));
    assert!(head_lower.contains("x-caller: 1"));
    assert!(!head_lower.contains("accept-encoding"));
    assert!(!head_lower.contains("accept: text/html"));
}
