//! Outbound data-fetch subsystem.
//!
//! # Data Flow
//! ```text
//! Component code (during a render)
//!     → FetchRequest { method, url, headers, body }
//!     → client.rs: DataFetcher::prepare
//!         → policy.rs: rewrite relative URL against the inbound origin
//!         → policy.rs: forward inbound headers minus the denylist
//!         → caller hooks (run after the propagation rewrite)
//!     → DataFetcher::send (hyper client, body collected)
//!
//! Outside a render (context dropped or never attached):
//!     → prepare is a pass-through; nothing is rewritten
//! ```
//!
//! # Design Decisions
//! - The policy rewrite always runs before caller hooks, so callers
//!   shape an already-qualified request
//! - Caller-set headers win over forwarded ones; forwarding augments,
//!   it never replaces
//! - The fetcher holds a `Weak` context reference: an in-flight fetch
//!   must not keep a settled request's context alive

pub mod client;
pub mod policy;

pub use client::{default_client, DataFetcher, FetchError, FetchRequest, FetchResponse, HttpClient};
pub use policy::FORWARD_DENYLIST;
