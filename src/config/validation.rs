//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Detect empty or unrooted route patterns
//! - Detect duplicate route names
//! - Validate value ranges (timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RenderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the middleware

use std::collections::HashSet;

use crate::config::schema::RenderConfig;

/// A single semantic problem found in a [`RenderConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("route table is empty; at least one route is required")]
    NoRoutes,

    #[error("route `{0}` has an empty pattern")]
    EmptyPattern(String),

    #[error("route `{0}` pattern must start with `/`")]
    UnrootedPattern(String),

    #[error("route `{0}` has an empty component")]
    EmptyComponent(String),

    #[error("duplicate route name `{0}`")]
    DuplicateName(String),

    #[error("route `{name}` has an invalid pattern: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Validate a configuration, reporting every problem found.
pub fn validate_config(config: &RenderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        if route.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern(route.name.clone()));
        } else if !route.pattern.starts_with('/') {
            errors.push(ValidationError::UnrootedPattern(route.name.clone()));
        }
        if route.component.is_empty() {
            errors.push(ValidationError::EmptyComponent(route.name.clone()));
        }
        if !seen.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }
    }

    if config.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
