//! Render engine boundary.
//!
//! The component-rendering engine stays external to this crate: the
//! middleware resolves routes, scopes state, and settles responses;
//! whatever turns a component tree into markup implements [`Renderer`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::render::outcome::{RenderError, RenderReply};
use crate::routing::RouteParams;

/// One render invocation: the matched component, its props, and the
/// request-scoped context.
pub struct RenderRequest {
    /// Component identifier from the matched route.
    pub component: String,
    /// Route parameters, passed as component props.
    pub props: RouteParams,
    /// State scoped to the request being rendered. Cookie reads,
    /// location reads and data fetches all go through here.
    pub context: Arc<RequestContext>,
    /// The configured deadline, for engines that can stop early. The
    /// orchestrator enforces it regardless.
    pub timeout: Option<Duration>,
}

/// The external component-rendering engine.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render one component tree to markup, or abort, or fail.
    async fn render(&self, request: RenderRequest) -> Result<RenderReply, RenderError>;
}
