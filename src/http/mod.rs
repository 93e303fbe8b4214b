//! HTTP adapter subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → gate.rs (resolve eligible middleware, attach to request)
//!     → server.rs report handler (JSON: method, path, middleware)
//! ```

pub mod gate;
pub mod server;

pub use gate::{annotate_eligible, EligibleMiddleware};
pub use server::{spawn_registry_reloader, EligibilityReport, GateServer};
