//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the eligibility report handler
//! - Wire up middleware (tracing, timeout, eligibility annotation)
//! - Bind server to listener
//! - Swap in reloaded manifests without restarting

use axum::{
    body::Body,
    http::Request,
    middleware,
    Json,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::{
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{GateConfig, LoadedConfig};
use crate::http::gate::{annotate_eligible, EligibleMiddleware};
use crate::matching::{MiddlewareRegistry, SharedRegistry};

/// Body returned for every request.
#[derive(Debug, Serialize)]
pub struct EligibilityReport {
    pub method: String,
    pub path: String,
    pub middleware: Vec<String>,
}

/// HTTP server that reports which middleware each request would run.
pub struct GateServer {
    router: Router,
    config: GateConfig,
    registry: Arc<SharedRegistry>,
}

impl GateServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        let registry = Arc::new(SharedRegistry::new(MiddlewareRegistry::from_config(&config)));
        let router = Self::build_router(&config, registry.clone());
        Self {
            router,
            config,
            registry,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, registry: Arc<SharedRegistry>) -> Router {
        Router::new()
            .fallback(report_handler)
            .layer(middleware::from_fn_with_state(registry, annotate_eligible))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The registry the router reads on every request.
    pub fn registry(&self) -> Arc<SharedRegistry> {
        self.registry.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            middleware = self.registry.load().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Apply reloaded manifests to `registry` until the sender goes away.
pub fn spawn_registry_reloader(
    registry: Arc<SharedRegistry>,
    mut updates: mpsc::UnboundedReceiver<LoadedConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(loaded) = updates.recv().await {
            if !loaded.diagnostics.is_empty() {
                tracing::warn!(
                    diagnostics = loaded.diagnostics.len(),
                    "Reloaded manifest has invalid matcher entries"
                );
            }
            registry.store(MiddlewareRegistry::from_config(&loaded.config));
        }
        tracing::debug!("Registry reloader stopped");
    })
}

async fn report_handler(request: Request<Body>) -> Json<EligibilityReport> {
    let middleware = request
        .extensions()
        .get::<EligibleMiddleware>()
        .cloned()
        .unwrap_or_default();

    Json(EligibilityReport {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        middleware: middleware.0,
    })
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MiddlewareConfig;
    use crate::config::validation::MatcherDiagnostic;
    use serde_json::json;

    fn config(patterns: serde_json::Value) -> GateConfig {
        GateConfig {
            middleware: vec![MiddlewareConfig {
                name: "auth".into(),
                matcher: Some(json!({ "patterns": patterns })),
            }],
            ..GateConfig::default()
        }
    }

    #[tokio::test]
    async fn test_reloader_swaps_registry() {
        let server = GateServer::new(config(json!(["/api"])));
        let registry = server.registry();
        assert_eq!(registry.load().len(), 1);

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_registry_reloader(registry.clone(), rx);

        let mut next = config(json!(["/v2/**"]));
        next.middleware.push(MiddlewareConfig {
            name: "logger".into(),
            matcher: None,
        });
        tx.send(LoadedConfig {
            config: next,
            diagnostics: Vec::<MatcherDiagnostic>::new(),
        })
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(registry.load().len(), 2);
        assert!(registry.load().get("logger").is_some());
    }
}
