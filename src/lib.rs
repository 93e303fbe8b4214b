//! Middleware gate library.
//!
//! Decides, per request, which registered middleware should run, from
//! declarative matchers built out of HTTP method allow-lists and path
//! patterns (literals, `*`/`**` globs, regular expressions).

pub mod config;
pub mod http;
pub mod matching;
pub mod observability;

pub use config::schema::GateConfig;
pub use http::GateServer;
pub use matching::{matches, should_run, MatcherConfig, MiddlewareRegistry, Pattern};
