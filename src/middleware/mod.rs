//! Middleware entry point.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → resolve path against the route table
//!         no match → next.run(request)   (delegated untouched)
//!         match    → orchestrator.respond (render → settle)
//! ```
//!
//! # Design Decisions
//! - Re-entrant across concurrent requests: the middleware holds only
//!   immutable configuration and the pooled outbound client
//! - Ordinary render failures never escape as panics or service errors;
//!   they settle inside the orchestrator
//! - Construction-time configuration errors surface at setup, never per
//!   request

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum::Router;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{validate_config, ConfigError, RenderConfig};
use crate::context::{CookieStore, Location};
use crate::fetch::{default_client, HttpClient};
use crate::render::engine::Renderer;
use crate::render::orchestrator::{
    ErrorEvent, RenderOrchestrator, RenderedEvent,
};
use crate::routing::RouteTable;
use crate::view::{HtmlShell, ViewEngine};

/// Isomorphic page-rendering middleware.
///
/// Build one per application at startup, then [`attach`](Self::attach)
/// it to an axum router. Requests whose path matches a configured route
/// are rendered; everything else flows to the inner service untouched.
pub struct RenderMiddleware {
    orchestrator: RenderOrchestrator,
}

impl RenderMiddleware {
    /// Validate `config` and build the middleware.
    ///
    /// A missing or invalid route table fails here, before any request
    /// is served.
    pub fn new(config: RenderConfig, renderer: Arc<dyn Renderer>) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let routes = RouteTable::from_config(&config.routes)
            .map_err(|error| ConfigError::Validation(vec![error]))?;

        let view: Arc<dyn ViewEngine> =
            Arc::new(HtmlShell::new("isorender").with_field(config.local.clone()));

        Ok(Self {
            orchestrator: RenderOrchestrator {
                routes: Arc::new(routes),
                renderer,
                view,
                client: default_client(),
                timeout: config.timeout(),
                local: config.local,
                view_name: config.view,
                rendered: None,
                error: None,
                cookie_factory: None,
                location_factory: None,
            },
        })
    }

    /// Replace the default [`HtmlShell`] view engine.
    pub fn with_view_engine(mut self, engine: Arc<dyn ViewEngine>) -> Self {
        self.orchestrator.view = engine;
        self
    }

    /// Replace the pooled outbound HTTP client.
    pub fn with_http_client(mut self, client: HttpClient) -> Self {
        self.orchestrator.client = client;
        self
    }

    /// Callback invoked exactly once per successfully emitted page.
    pub fn with_rendered(
        mut self,
        callback: impl Fn(&RenderedEvent) + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator.rendered = Some(Arc::new(callback));
        self
    }

    /// Callback that takes over failure handling and produces the
    /// failure response. The default logged-500 path is skipped.
    pub fn with_error(
        mut self,
        callback: impl Fn(&ErrorEvent) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator.error = Some(Arc::new(callback));
        self
    }

    /// Inject a cookie-store factory (tests, custom stores).
    pub fn with_cookie_factory(
        mut self,
        factory: impl Fn(&Parts) -> CookieStore + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator.cookie_factory = Some(Arc::new(factory));
        self
    }

    /// Inject a location factory.
    pub fn with_location_factory(
        mut self,
        factory: impl Fn(&Parts) -> Location + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator.location_factory = Some(Arc::new(factory));
        self
    }

    /// Layer this middleware onto `router`.
    pub fn attach(self, router: Router) -> Router {
        router.layer(axum::middleware::from_fn_with_state(
            Arc::new(self),
            render_pages,
        ))
    }
}

/// The per-request entry point: render a matched route, or delegate to
/// the inner service exactly once.
pub async fn render_pages(
    State(middleware): State<Arc<RenderMiddleware>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(matched) = middleware.orchestrator.resolve(request.uri().path()) else {
        return next.run(request).await;
    };

    // Page renders consume only the request head; the body (if any)
    // plays no part in rendering.
    let (parts, _body) = request.into_parts();

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "render",
        %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
    );

    middleware
        .orchestrator
        .respond(&parts, matched)
        .instrument(span)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RouteConfig, ValidationError};
    use crate::render::outcome::{RenderError, RenderReply};
    use crate::render::RenderRequest;
    use async_trait::async_trait;

    struct NoopRenderer;

    #[async_trait]
    impl Renderer for NoopRenderer {
        async fn render(&self, _request: RenderRequest) -> Result<RenderReply, RenderError> {
            Ok(RenderReply::markup(""))
        }
    }

    #[test]
    fn missing_routes_fail_at_construction() {
        let err = RenderMiddleware::new(RenderConfig::default(), Arc::new(NoopRenderer))
            .err()
            .expect("construction must fail");
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::NoRoutes]);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn valid_config_constructs() {
        let config = RenderConfig {
            routes: vec![RouteConfig::new("home", "/", "Home")],
            ..RenderConfig::default()
        };
        assert!(RenderMiddleware::new(config, Arc::new(NoopRenderer)).is_ok());
    }
}
