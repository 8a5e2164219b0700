//! Configuration schema definitions.
//!
//! This module defines the middleware configuration structure.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the rendering middleware.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Route definitions mapping request paths to view components.
    ///
    /// Required: an empty table fails validation.
    pub routes: Vec<RouteConfig>,

    /// Render deadline in milliseconds. `None` lets a render run
    /// unbounded; an elapsed deadline settles as a render failure.
    pub timeout_ms: Option<u64>,

    /// Name of the response field the rendered markup is written to.
    pub local: String,

    /// Name of the view handed to the view engine on success.
    pub view: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            timeout_ms: None,
            local: "body".to_string(),
            view: "index".to_string(),
        }
    }
}

impl RenderConfig {
    /// Render deadline as a [`Duration`], if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Route configuration mapping a path pattern to a view component.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier, used for logging and for redirect targets.
    pub name: String,

    /// Path pattern. Parameters use `{name}` syntax, catch-alls
    /// `{*name}` (e.g. `/users/{id}`, `/blog/{*slug}`).
    pub pattern: String,

    /// Component identifier handed to the render engine.
    pub component: String,
}

impl RouteConfig {
    /// Convenience constructor for in-code route tables.
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            component: component.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RenderConfig::default();
        assert_eq!(config.local, "body");
        assert_eq!(config.view, "index");
        assert!(config.routes.is_empty());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
            [[routes]]
            name = "home"
            pattern = "/"
            component = "Home"
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].component, "Home");
        assert_eq!(config.local, "body");
        assert_eq!(config.view, "index");
    }

    #[test]
    fn timeout_is_millis() {
        let config: RenderConfig = toml::from_str("timeout_ms = 1500").unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }
}
