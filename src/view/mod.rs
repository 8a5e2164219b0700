//! Response emission boundary.
//!
//! The orchestrator hands the view engine a view name and a locals map
//! (the rendered markup sits under the configured field, `body` by
//! default); the engine produces the final document. [`HtmlShell`] is
//! the built-in engine; applications with their own templating plug in
//! via [`ViewEngine`].

use serde_json::Value;

/// Locals handed to the view engine; the rendered markup lives under
/// the configured response field.
pub type Locals = serde_json::Map<String, Value>;

/// View rendering failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("unknown view `{0}`")]
    UnknownView(String),

    #[error("locals are missing the `{0}` field")]
    MissingLocal(String),
}

/// Produces the response document for a view name and locals map.
pub trait ViewEngine: Send + Sync {
    fn render_view(&self, view: &str, locals: &Locals) -> Result<String, ViewError>;
}

/// Default view engine: wraps the markup field in a full HTML document.
pub struct HtmlShell {
    app_name: String,
    css_path: Option<String>,
    field: String,
}

impl HtmlShell {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            css_path: None,
            field: "body".to_string(),
        }
    }

    /// Link a stylesheet in the document head.
    pub fn with_css(mut self, path: impl Into<String>) -> Self {
        self.css_path = Some(path.into());
        self
    }

    /// Which locals field holds the markup (matches the middleware's
    /// `local` setting).
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl ViewEngine for HtmlShell {
    fn render_view(&self, _view: &str, locals: &Locals) -> Result<String, ViewError> {
        let body = locals
            .get(&self.field)
            .and_then(Value::as_str)
            .ok_or_else(|| ViewError::MissingLocal(self.field.clone()))?;

        let css_link = self
            .css_path
            .as_deref()
            .map(|p| format!(r#"<link rel="stylesheet" href="{p}">"#))
            .unwrap_or_default();

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {css_link}
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#,
            title = self.app_name,
        ))
    }
}
