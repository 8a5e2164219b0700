//! Render subsystem.
//!
//! # Data Flow
//! ```text
//! Matched Request
//!     → orchestrator.rs: build RequestContext
//!     → engine.rs: Renderer::render(RenderRequest) under the deadline
//!     → outcome.rs: RenderOutcome { Rendered | Aborted | Failed }
//!     → orchestrator.rs: settle into an HTTP response
//!         Rendered  → view engine → 200 markup (+ queued cookies)
//!         Aborted (redirect) → make_path → 302
//!         Aborted (other)    → warn + 204 fallback
//!         Failed    → error callback, or logged 500
//! ```
//!
//! # Design Decisions
//! - Exactly one outcome case holds per render attempt
//! - Aborts are tagged where they are raised, never re-derived from a
//!   type name downstream
//! - The deadline is enforced here with Tokio's timeout facilities; an
//!   elapsed deadline is an ordinary render failure, not a new state

pub mod engine;
pub mod orchestrator;
pub mod outcome;

pub use engine::{Renderer, RenderRequest};
pub use orchestrator::{ErrorCallback, ErrorEvent, RenderedCallback, RenderedEvent, RenderOrchestrator};
pub use outcome::{Abort, Rendered, RenderError, RenderOutcome, RenderReply};
