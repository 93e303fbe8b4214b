//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (matcher diagnostics at warn, reloads at info,
//!       per-request eligibility at debug)
//!     → logging.rs (subscriber: env filter + fmt/JSON layer)
//! ```

pub mod logging;

pub use logging::init_logging;
