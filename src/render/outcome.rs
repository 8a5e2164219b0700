//! Render outcome model.

use std::time::Duration;

use crate::routing::{PathError, QueryParams, RouteParams};
use crate::view::ViewError;

/// A render-time signal that short-circuits markup production.
///
/// Decided at the point the abort is raised; the orchestrator never
/// inspects anything but the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Abort {
    /// Render a redirect to a named route instead of markup.
    Redirect {
        to: String,
        params: RouteParams,
        query: QueryParams,
    },
    /// Any other abort reason. Settles as an empty 204 response.
    Other(String),
}

impl Abort {
    /// A redirect to `route` with no params or query.
    pub fn redirect(route: impl Into<String>) -> Self {
        Self::Redirect {
            to: route.into(),
            params: RouteParams::new(),
            query: QueryParams::new(),
        }
    }
}

/// Successfully rendered markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
}

impl Rendered {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

/// What a render engine settles with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderReply {
    Markup(Rendered),
    Abort(Abort),
}

impl RenderReply {
    /// Markup shorthand.
    pub fn markup(html: impl Into<String>) -> Self {
        Self::Markup(Rendered::new(html))
    }
}

/// Render failure, including an elapsed deadline.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render timed out after {0:?}")]
    Timeout(Duration),

    #[error("render engine: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("redirect target: {0}")]
    Path(#[from] PathError),

    #[error("view: {0}")]
    View(#[from] ViewError),
}

impl RenderError {
    /// Wrap any engine-side error.
    pub fn engine(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Engine(error.into())
    }
}

/// Terminal state of one render attempt. Exactly one case holds.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(Rendered),
    Aborted(Abort),
    Failed(RenderError),
}
