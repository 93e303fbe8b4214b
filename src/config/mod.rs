//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (structural checks, matcher diagnostics)
//!     → GateConfig (validated, immutable)
//!     → matching::MiddlewareRegistry::from_config
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new manifest
//!     → validation.rs validates
//!     → atomic swap of the shared registry
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal manifests
//! - Malformed matcher entries are diagnostics, not load failures

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError, ConfigFormat, LoadedConfig};
pub use schema::GateConfig;
pub use schema::MiddlewareConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
pub use validation::{validate_matcher, MatcherDiagnostic};
