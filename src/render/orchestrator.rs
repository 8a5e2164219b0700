//! Per-request render orchestration.
//!
//! # Responsibilities
//! - Build the request-scoped context for a matched route
//! - Invoke the render engine under the configured deadline
//! - Settle the outcome into exactly one HTTP response
//! - Invoke the configured success/error callbacks, each at most once
//!
//! # Design Decisions
//! - Render failures never propagate to the surrounding service stack;
//!   they become the error callback's response or a logged 500
//! - Queued `Set-Cookie` values are stamped on every settled response,
//!   markup and redirect alike
//! - Collaborator factories are injected here, not registered globally,
//!   so independent middleware instances cannot interfere

use std::sync::Arc;
use std::time::Duration;

use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;

use crate::context::{CookieFactory, LocationFactory, RequestContext};
use crate::fetch::HttpClient;
use crate::render::engine::{RenderRequest, Renderer};
use crate::render::outcome::{Abort, RenderError, RenderOutcome, RenderReply, Rendered};
use crate::routing::{RouteMatch, RouteTable};
use crate::view::{Locals, ViewEngine};

/// Passed to the success callback after markup has been emitted.
pub struct RenderedEvent {
    pub method: Method,
    pub uri: Uri,
    pub html: String,
}

/// Passed to the error callback; the callback owns the response.
pub struct ErrorEvent {
    pub method: Method,
    pub uri: Uri,
    pub error: RenderError,
}

/// Success callback, invoked exactly once per successfully emitted page.
pub type RenderedCallback = Arc<dyn Fn(&RenderedEvent) + Send + Sync>;

/// Failure callback. When configured it produces the failure response
/// and the default logged-500 path is skipped entirely.
pub type ErrorCallback = Arc<dyn Fn(&ErrorEvent) -> Response + Send + Sync>;

/// Drives `Matching → Rendering → terminal` for one request.
pub struct RenderOrchestrator {
    pub(crate) routes: Arc<RouteTable>,
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) view: Arc<dyn ViewEngine>,
    pub(crate) client: HttpClient,
    pub(crate) timeout: Option<Duration>,
    pub(crate) local: String,
    pub(crate) view_name: String,
    pub(crate) rendered: Option<RenderedCallback>,
    pub(crate) error: Option<ErrorCallback>,
    pub(crate) cookie_factory: Option<CookieFactory>,
    pub(crate) location_factory: Option<LocationFactory>,
}

impl RenderOrchestrator {
    /// Route lookup; `None` means the request is not ours and must be
    /// delegated onward untouched.
    pub(crate) fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.routes.resolve(path)
    }

    /// Render a matched route and settle it into a response.
    pub(crate) async fn respond(&self, parts: &Parts, matched: RouteMatch) -> Response {
        let context = RequestContext::build(
            parts,
            self.client.clone(),
            self.cookie_factory.as_ref(),
            self.location_factory.as_ref(),
        );

        tracing::debug!(
            route = %matched.route.name,
            component = %matched.route.component,
            "rendering route"
        );

        let outcome = self.render(matched, Arc::clone(&context)).await;
        self.settle(parts, &context, outcome)
    }

    async fn render(&self, matched: RouteMatch, context: Arc<RequestContext>) -> RenderOutcome {
        let request = RenderRequest {
            component: matched.route.component,
            props: matched.params,
            context,
            timeout: self.timeout,
        };

        let reply = match self.timeout {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.renderer.render(request)).await {
                    Ok(reply) => reply,
                    Err(_) => Err(RenderError::Timeout(deadline)),
                }
            }
            None => self.renderer.render(request).await,
        };

        match reply {
            Ok(RenderReply::Markup(rendered)) => RenderOutcome::Rendered(rendered),
            Ok(RenderReply::Abort(abort)) => RenderOutcome::Aborted(abort),
            Err(error) => RenderOutcome::Failed(error),
        }
    }

    fn settle(&self, parts: &Parts, context: &RequestContext, outcome: RenderOutcome) -> Response {
        let response = match outcome {
            RenderOutcome::Rendered(rendered) => self.emit_markup(parts, rendered),

            RenderOutcome::Aborted(Abort::Redirect { to, params, query }) => {
                match self.routes.make_path(&to, &params, &query) {
                    Ok(path) => {
                        tracing::debug!(url = %parts.uri, to = %path, "render aborted with redirect");
                        (StatusCode::FOUND, [(header::LOCATION, path)]).into_response()
                    }
                    Err(error) => self.fail(parts, RenderError::Path(error)),
                }
            }

            RenderOutcome::Aborted(Abort::Other(reason)) => {
                // The render produced nothing to send. Reply rather
                // than leave the request hanging.
                tracing::warn!(url = %parts.uri, reason = %reason, "render aborted without a redirect");
                StatusCode::NO_CONTENT.into_response()
            }

            RenderOutcome::Failed(error) => self.fail(parts, error),
        };

        stamp_cookies(context, response)
    }

    fn emit_markup(&self, parts: &Parts, rendered: Rendered) -> Response {
        let mut locals = Locals::new();
        locals.insert(self.local.clone(), Value::String(rendered.html.clone()));

        match self.view.render_view(&self.view_name, &locals) {
            Ok(document) => {
                if let Some(callback) = &self.rendered {
                    callback(&RenderedEvent {
                        method: parts.method.clone(),
                        uri: parts.uri.clone(),
                        html: rendered.html,
                    });
                }
                Html(document).into_response()
            }
            Err(error) => self.fail(parts, RenderError::View(error)),
        }
    }

    /// Exactly one of {error callback, default logged 500} happens.
    fn fail(&self, parts: &Parts, error: RenderError) -> Response {
        if let Some(callback) = &self.error {
            return callback(&ErrorEvent {
                method: parts.method.clone(),
                uri: parts.uri.clone(),
                error,
            });
        }

        tracing::error!(url = %parts.uri, error = %error, detail = ?error, "failed to render");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Apply the cookie store's queued `Set-Cookie` values to the settled
/// response.
fn stamp_cookies(context: &RequestContext, mut response: Response) -> Response {
    for cookie in context.cookies().take_pending() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(_) => tracing::warn!(cookie = %cookie, "dropping unencodable set-cookie value"),
        }
    }
    response
}
