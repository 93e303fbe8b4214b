//! Compiled middleware lookup.
//!
//! # Responsibilities
//! - Compile every configured matcher once, at load time
//! - Answer "which middleware run for this request" in declaration order
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over middleware; each matcher short-circuits on first pattern hit
//! - Reloads build a fresh registry and swap it in via [`SharedRegistry`]

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::GateConfig;
use crate::matching::matcher::{should_run, MatcherConfig};
use crate::matching::request::RequestView;

/// A middleware entry with its compiled matcher.
#[derive(Debug, Clone)]
pub struct CompiledMiddleware {
    pub name: String,
    pub matcher: Option<MatcherConfig>,
}

impl CompiledMiddleware {
    pub fn should_run<R: RequestView + ?Sized>(&self, request: &R) -> bool {
        should_run(request, self.matcher.as_ref())
    }
}

/// Ordered set of compiled middleware.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareRegistry {
    entries: Vec<CompiledMiddleware>,
}

impl MiddlewareRegistry {
    /// Compile all middleware in `config`.
    pub fn from_config(config: &GateConfig) -> Self {
        let entries = config
            .middleware
            .iter()
            .map(|m| CompiledMiddleware {
                name: m.name.clone(),
                matcher: m.matcher.as_ref().map(MatcherConfig::from_value),
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = entries.len(), "Middleware registry compiled");
        Self { entries }
    }

    pub fn from_entries(entries: Vec<CompiledMiddleware>) -> Self {
        Self { entries }
    }

    /// Names of the middleware that should run for `request`, in declaration order.
    pub fn eligible<R: RequestView + ?Sized>(&self, request: &R) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|m| m.should_run(request))
            .map(|m| m.name.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&CompiledMiddleware> {
        self.entries.iter().find(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A registry that can be replaced while requests are being served.
#[derive(Debug)]
pub struct SharedRegistry {
    inner: ArcSwap<MiddlewareRegistry>,
}

impl SharedRegistry {
    pub fn new(registry: MiddlewareRegistry) -> Self {
        Self {
            inner: ArcSwap::from_pointee(registry),
        }
    }

    /// Current registry snapshot.
    pub fn load(&self) -> Arc<MiddlewareRegistry> {
        self.inner.load_full()
    }

    /// Atomically replace the registry.
    pub fn store(&self, registry: MiddlewareRegistry) {
        let count = registry.len();
        self.inner.store(Arc::new(registry));
        tracing::info!(middleware = count, "Middleware registry swapped");
    }
}
