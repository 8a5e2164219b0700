//! Isomorphic server-side rendering middleware for axum.
//!
//! Requests whose path matches a configured route are rendered through
//! a pluggable component engine inside a request-scoped context
//! (cookies, location, outbound HTTP client); everything else flows to
//! the inner service untouched. Outbound data fetches issued during a
//! render are rewritten to look like the browser's own calls: relative
//! URLs are qualified against the inbound origin and inbound headers
//! are forwarded, minus transport-negotiation headers.

pub mod config;
pub mod context;
pub mod fetch;
pub mod middleware;
pub mod render;
pub mod routing;
pub mod view;

pub use config::{load_config, ConfigError, RenderConfig, RouteConfig};
pub use context::{CookieStore, Location, RequestContext};
pub use fetch::{DataFetcher, FetchRequest, FetchResponse};
pub use middleware::RenderMiddleware;
pub use render::{Abort, RenderError, RenderReply, RenderRequest, Rendered, Renderer};
pub use routing::{QueryParams, RouteParams, RouteTable};
pub use view::{HtmlShell, ViewEngine};
