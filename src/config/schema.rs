//! Configuration schema definitions.
//!
//! This module defines the manifest structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration: the middleware manifest plus runtime settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Middleware in the order the router runs them.
    pub middleware: Vec<MiddlewareConfig>,

    /// HTTP adapter settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// One middleware and its matcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MiddlewareConfig {
    /// Middleware identifier for logging and lookup.
    pub name: String,

    /// Raw matcher object (`methods`, `patterns`). Kept untyped so malformed
    /// entries can be reported instead of failing the whole load.
    #[serde(default)]
    pub matcher: Option<Value>,
}

/// HTTP adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
