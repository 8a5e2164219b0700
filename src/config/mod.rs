//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file (or in-code construction)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors reported)
//!     → RenderConfig (validated, immutable)
//!     → RenderMiddleware::new (re-validated at construction)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing here is mutated per request
//! - All fields except `routes` have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A missing route table is a fatal setup error, never a per-request one

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{RenderConfig, RouteConfig};
pub use validation::{validate_config, ValidationError};
