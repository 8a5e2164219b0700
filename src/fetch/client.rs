//! Request-scoped outbound HTTP client.
//!
//! # Responsibilities
//! - Apply the propagation policy to every outbound fetch issued while
//!   a render is in flight
//! - Pass calls through untouched when no render owns the fetcher
//! - Execute the call and collect the response body
//!
//! # Design Decisions
//! - One pooled hyper client per middleware instance; the per-request
//!   part is only the `Weak` context handle
//! - Caller hooks run after the propagation rewrite, preserving its
//!   front-of-chain position

use std::sync::{Arc, Weak};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::fetch::policy;

/// The pooled outbound client shared by all fetchers of a middleware
/// instance.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the default pooled client.
pub fn default_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// A mutable outbound request descriptor, shaped before sending.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Set a header explicitly. Caller-set headers take precedence over
    /// anything the propagation policy forwards. Invalid names or
    /// values are ignored.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::debug!(name, "dropping invalid fetch header"),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// A collected outbound response.
#[derive(Debug)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Outbound fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid fetch url `{0}`")]
    InvalidUrl(String),

    #[error("building fetch request: {0}")]
    Http(#[from] axum::http::Error),

    #[error("fetch transport: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("reading fetch body: {0}")]
    Body(#[from] hyper::Error),
}

type Hook = Arc<dyn Fn(&mut FetchRequest) + Send + Sync>;

/// Outbound client handle scoped to (at most) one render.
///
/// Holds a `Weak` back-reference to the owning [`RequestContext`]: the
/// fetcher is used for lookup only and must not extend the context's
/// lifetime. Once the render settles and the context drops, the fetcher
/// degrades to a plain pass-through client.
#[derive(Clone)]
pub struct DataFetcher {
    context: Weak<RequestContext>,
    client: HttpClient,
    hooks: Vec<Hook>,
}

impl DataFetcher {
    pub(crate) fn new(context: Weak<RequestContext>, client: HttpClient) -> Self {
        Self { context, client, hooks: Vec::new() }
    }

    /// A fetcher with no owning render; never rewrites anything.
    pub fn detached(client: HttpClient) -> Self {
        Self::new(Weak::new(), client)
    }

    /// Register a caller hook, run after the propagation rewrite in
    /// registration order.
    pub fn add_hook(&mut self, hook: impl Fn(&mut FetchRequest) + Send + Sync + 'static) {
        self.hooks.push(Arc::new(hook));
    }

    /// Shape an outbound request.
    ///
    /// With a live owning context: qualify a relative URL against the
    /// inbound origin and forward inbound headers minus the denylist
    /// (caller-set headers win). Without one — outside any render —
    /// the request passes through unmodified.
    pub fn prepare(&self, mut request: FetchRequest) -> FetchRequest {
        if let Some(context) = self.context.upgrade() {
            if let Some(base) = context.base_url() {
                request.url = policy::rewrite_url(&request.url, &base);
            }
            policy::forward_headers(context.headers(), &mut request.headers);
        }
        for hook in &self.hooks {
            hook(&mut request);
        }
        request
    }

    /// Shape, send, and collect one outbound call.
    pub async fn send(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let request = self.prepare(request);

        let uri: Uri = request
            .url
            .parse()
            .map_err(|_| FetchError::InvalidUrl(request.url.clone()))?;
        if uri.authority().is_none() {
            // A relative URL that never got a base; refuse before hyper does.
            return Err(FetchError::InvalidUrl(request.url));
        }

        let mut outbound = axum::http::Request::builder()
            .method(request.method.clone())
            .uri(uri)
            .body(Body::from(request.body))?;
        *outbound.headers_mut() = request.headers;

        tracing::debug!(method = %outbound.method(), url = %outbound.uri(), "outbound fetch");

        let response = self.client.request(outbound).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(FetchResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Convenience GET.
    pub async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.send(FetchRequest::get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::request::Parts;
    use axum::http::Request;

    fn parts_for(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/profile/7?tab=posts");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(Body::empty()).unwrap().into_parts().0
    }

    fn context_for(headers: &[(&str, &str)]) -> Arc<RequestContext> {
        RequestContext::from_parts(&parts_for(headers), default_client())
    }

    #[test]
    fn prepare_rewrites_relative_urls_against_the_origin() {
        let ctx = context_for(&[("host", "example.com"), ("x-forwarded-proto", "https")]);
        let prepared = ctx.fetcher().prepare(FetchRequest::get("/api/user"));
        assert_eq!(prepared.url, "https://example.com/api/user");
    }

    #[test]
    fn prepare_leaves_absolute_urls_alone() {
        let ctx = context_for(&[("host", "example.com")]);
        let prepared = ctx.fetcher().prepare(FetchRequest::get("http://other.test/api"));
        assert_eq!(prepared.url, "http://other.test/api");
    }

    #[test]
    fn prepare_forwards_headers_minus_denylist() {
        let ctx = context_for(&[
            ("host", "example.com"),
            ("cookie", "sid=abc"),
            ("accept-encoding", "gzip"),
            ("x-tenant", "acme"),
        ]);
        let prepared = ctx.fetcher().prepare(FetchRequest::get("/api"));

        assert_eq!(prepared.headers.get("cookie").unwrap(), "sid=abc");
        assert_eq!(prepared.headers.get("x-tenant").unwrap(), "acme");
        assert!(prepared.headers.get("accept-encoding").is_none());
        assert!(prepared.headers.get("host").is_none());
    }

    #[test]
    fn caller_set_headers_survive_prepare() {
        let ctx = context_for(&[("host", "example.com"), ("x-tenant", "acme")]);
        let prepared = ctx
            .fetcher()
            .prepare(FetchRequest::get("/api").header("x-tenant", "mine"));
        assert_eq!(prepared.headers.get("x-tenant").unwrap(), "mine");
    }

    #[test]
    fn dropped_context_degrades_to_pass_through() {
        let ctx = context_for(&[("host", "example.com"), ("cookie", "sid=abc")]);
        let fetcher = ctx.fetcher();
        drop(ctx);

        let prepared = fetcher.prepare(FetchRequest::get("/api"));
        assert_eq!(prepared.url, "/api");
        assert!(prepared.headers.is_empty());
    }

    #[test]
    fn detached_fetcher_never_rewrites() {
        let fetcher = DataFetcher::detached(default_client());
        let prepared = fetcher.prepare(FetchRequest::get("/api").header("x-a", "1"));
        assert_eq!(prepared.url, "/api");
        assert_eq!(prepared.headers.len(), 1);
    }

    #[test]
    fn hooks_run_after_the_policy_rewrite() {
        let ctx = context_for(&[("host", "example.com")]);
        let mut fetcher = ctx.fetcher();

        let seen_url = Arc::new(std::sync::Mutex::new(None));
        let recorded = seen_url.clone();
        fetcher.add_hook(move |req| {
            *recorded.lock().unwrap() = Some(req.url.clone());
            req.headers.insert("x-hooked", HeaderValue::from_static("1"));
        });

        let prepared = fetcher.prepare(FetchRequest::get("/api"));

        // The hook observed the already-qualified URL.
        assert_eq!(
            seen_url.lock().unwrap().as_deref(),
            Some("http://example.com/api")
        );
        assert_eq!(prepared.headers.get("x-hooked").unwrap(), "1");
    }

    #[tokio::test]
    async fn sending_a_relative_url_without_a_base_fails_cleanly() {
        let fetcher = DataFetcher::detached(default_client());
        let err = fetcher.fetch("/api").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
