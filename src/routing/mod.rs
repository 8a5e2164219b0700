//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → table.rs (radix-tree lookup)
//!     → Return: matched RouteMatch { route, params } or explicit no-match
//!
//! Redirect target (route name, params, query)
//!     → paths.rs (inverse lookup: substitute params, append query)
//!     → Return: concrete path string or PathError
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → insert patterns into matchit radix tree
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Matching is synchronous and side-effect-free; no retries
//! - Explicit no-match (`None`) rather than a silent default route
//! - Path generation is the exact inverse of matching, so a redirect
//!   target always round-trips through the same table

use std::collections::HashMap;

pub mod paths;
pub mod table;

pub use paths::PathError;
pub use table::{Route, RouteMatch, RouteTable};

/// Route parameters extracted from a matched path (e.g. `id` from `/users/{id}`).
pub type RouteParams = HashMap<String, String>;

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;
