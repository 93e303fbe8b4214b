//! Configuration validation.
//!
//! # Responsibilities
//! - Structural checks on the manifest (names present and unique, timeouts > 0)
//! - Matcher diagnostics: one message per malformed `methods` / `patterns` entry
//!
//! # Design Decisions
//! - Structural errors reject the manifest; all of them are returned, not just the first
//! - Matcher diagnostics never reject anything. Matching proceeds and the
//!   malformed entries simply never match
//! - Both checks are pure functions over the parsed config

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::matching::matcher::{field, pattern_from_value};

/// Methods a matcher may list.
pub const KNOWN_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// A structural manifest error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("middleware #{0} has an empty name")]
    EmptyName(usize),

    #[error("middleware {0:?} is declared more than once")]
    DuplicateName(String),

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// What is wrong with a matcher entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("matcher must be an object")]
    NotAnObject,

    #[error("`methods` must be an array")]
    MethodsNotArray,

    #[error("method at index {index} must be a string")]
    MethodNotString { index: usize },

    #[error("unknown HTTP method {method:?} at index {index}")]
    UnknownMethod { index: usize, method: String },

    #[error("`patterns` must be an array")]
    PatternsNotArray,

    #[error("pattern at index {index} must be a string or a regular expression")]
    UnsupportedPattern { index: usize },

    #[error("pattern at index {index} does not compile: {reason}")]
    InvalidPattern { index: usize, reason: String },
}

/// A non-fatal report about one malformed matcher entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherDiagnostic {
    pub middleware: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for MatcherDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "middleware {:?}: {}", self.middleware, self.kind)
    }
}

/// Structural validation. Returns every error found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, m) in config.middleware.iter().enumerate() {
        if m.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(i));
        } else if !seen.insert(m.name.as_str()) {
            errors.push(ValidationError::DuplicateName(m.name.clone()));
        }
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Diagnose every matcher in the manifest.
pub fn diagnose_config(config: &GateConfig) -> Vec<MatcherDiagnostic> {
    config
        .middleware
        .iter()
        .filter_map(|m| m.matcher.as_ref().map(|raw| validate_matcher(&m.name, raw)))
        .flatten()
        .collect()
}

/// Diagnose one raw matcher. Each diagnostic is also logged at `warn`.
pub fn validate_matcher(middleware: &str, raw: &Value) -> Vec<MatcherDiagnostic> {
    let kinds = matcher_faults(raw);

    kinds
        .into_iter()
        .map(|kind| {
            let diagnostic = MatcherDiagnostic {
                middleware: middleware.to_string(),
                kind,
            };
            tracing::warn!(middleware = %middleware, "Invalid matcher: {}", diagnostic.kind);
            diagnostic
        })
        .collect()
}

fn matcher_faults(raw: &Value) -> Vec<DiagnosticKind> {
    let Some(obj) = raw.as_object() else {
        return vec![DiagnosticKind::NotAnObject];
    };
    let mut faults = Vec::new();

    if let Some(methods) = field(obj, "methods") {
        match methods.as_array() {
            None => faults.push(DiagnosticKind::MethodsNotArray),
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    match item.as_str() {
                        None => faults.push(DiagnosticKind::MethodNotString { index }),
                        Some(m) if !is_known_method(m) => {
                            faults.push(DiagnosticKind::UnknownMethod {
                                index,
                                method: m.to_string(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
        }
    }

    if let Some(patterns) = field(obj, "patterns") {
        match patterns.as_array() {
            None => faults.push(DiagnosticKind::PatternsNotArray),
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    match pattern_from_value(item) {
                        None => faults.push(DiagnosticKind::UnsupportedPattern { index }),
                        Some(Err(e)) => faults.push(DiagnosticKind::InvalidPattern {
                            index,
                            reason: e.to_string(),
                        }),
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }

    faults
}

fn is_known_method(method: &str) -> bool {
    KNOWN_METHODS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(method))
}
