//! Demo server for the rendering middleware.
//!
//! Boots a small isomorphic app: a home page, a profile page, and a
//! legacy path that aborts into a redirect. The demo renderer stands in
//! for a real component engine and shows the request-scoped context at
//! work (cookies, location, route props).
//!
//! ```text
//! ISORENDER_ADDR=127.0.0.1:3000 cargo run [config.toml]
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use isorender::render::{RenderError, RenderReply, RenderRequest, Renderer};
use isorender::{Abort, RenderConfig, RenderMiddleware, RouteConfig};

/// Stand-in component engine for the demo routes.
struct DemoRenderer;

#[async_trait]
impl Renderer for DemoRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderReply, RenderError> {
        // The legacy route exists only to demonstrate redirect aborts.
        if request.component == "Legacy" {
            let mut abort = Abort::redirect("profile");
            if let Abort::Redirect { params, .. } = &mut abort {
                params.extend(request.props.clone());
            }
            return Ok(RenderReply::Abort(abort));
        }

        let cookies = request.context.cookies();
        let visits = cookies
            .get("visits")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        cookies.set("visits", &visits.to_string());

        let location = request.context.location();
        let mut props: Vec<_> = request.props.iter().collect();
        props.sort();
        let props = props
            .iter()
            .map(|(k, v)| format!("<li><code>{k}</code> = {v}</li>"))
            .collect::<String>();

        Ok(RenderReply::markup(format!(
            "<h1>{component}</h1>\n\
             <p>You are visiting <code>{url}</code> on <code>{hostname}</code> \
             over <code>{protocol}</code> — visit #{visits}.</p>\n\
             <ul>{props}</ul>",
            component = request.component,
            url = location.url,
            hostname = location.hostname,
            protocol = location.protocol,
        )))
    }
}

fn demo_config() -> RenderConfig {
    RenderConfig {
        routes: vec![
            RouteConfig::new("home", "/", "Home"),
            RouteConfig::new("profile", "/profile/{id}", "Profile"),
            RouteConfig::new("legacy", "/legacy/{id}", "Legacy"),
        ],
        ..RenderConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "isorender=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => isorender::load_config(Path::new(&path))?,
        None => demo_config(),
    };

    tracing::info!(
        routes = config.routes.len(),
        view = %config.view,
        local = %config.local,
        "configuration loaded"
    );

    let middleware = RenderMiddleware::new(config, Arc::new(DemoRenderer))?
        .with_rendered(|event| {
            tracing::info!(url = %event.uri, bytes = event.html.len(), "page rendered");
        });

    let app = middleware
        .attach(axum::Router::new())
        .layer(TraceLayer::new_for_http());

    let addr = std::env::var("ISORENDER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %listener.local_addr()?, "isorender demo listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
