//! Matching subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → registry.rs (walk middleware in declaration order)
//!     → matcher.rs (method allow-list, then pattern list)
//!     → pattern.rs (literal / glob / regex test)
//!     → Return: names of middleware that should run
//!
//! Matcher Compilation (at load):
//!     raw matcher JSON
//!     → matcher.rs (lenient build, malformed entries dropped)
//!     → glob.rs (per-segment rules → anchored regex)
//!     → Freeze as immutable MiddlewareRegistry
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once per load, never per request
//! - Absent clause = run, empty clause = never run
//! - Deterministic: same input always yields the same answer

pub mod glob;
pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod request;

pub use glob::{Glob, SegmentRule};
pub use matcher::{should_run, MatcherConfig};
pub use pattern::{matches, matches_str, Pattern, PatternError};
pub use registry::{CompiledMiddleware, MiddlewareRegistry, SharedRegistry};
pub use request::{IncomingRequest, RequestView};
