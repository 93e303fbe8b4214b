//! Path patterns and the single-pattern tester.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::matching::glob::Glob;

/// Errors raised while building a [`Pattern`].
#[derive(Debug, Error)]
pub enum PatternError {
    /// The regular expression failed to compile.
    #[error("invalid regular expression {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A regex flag outside `i`, `m`, `s`, `x`.
    #[error("unsupported regex flag {0:?}")]
    UnknownFlag(char),
}

/// One entry of a matcher's `patterns` list.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact path equality.
    Literal(String),
    /// A string containing `*`.
    Glob(Glob),
    /// Tested directly against the path.
    Regex(Regex),
}

impl Pattern {
    /// Build a pattern from a string. Strings containing `*` compile to a glob;
    /// everything else is a literal.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.contains('*') {
            Glob::compile(source).map(Pattern::Glob)
        } else {
            Ok(Pattern::Literal(source.to_string()))
        }
    }

    /// Build a regex pattern. `flags` uses the one-letter JavaScript-style names.
    pub fn regex(source: &str, flags: &str) -> Result<Self, PatternError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                other => return Err(PatternError::UnknownFlag(other)),
            };
        }

        builder
            .build()
            .map(Pattern::Regex)
            .map_err(|e| PatternError::InvalidRegex {
                pattern: source.to_string(),
                source: e,
            })
    }
}

/// Test one pattern against a request path.
///
/// A string pattern equal to the path matches before any glob interpretation.
pub fn matches(path: &str, pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Regex(re) => re.is_match(path),
        Pattern::Literal(text) => text == path,
        Pattern::Glob(glob) => glob.source() == path || glob.is_match(path),
    }
}

/// Compile `pattern` and test it in one step. A pattern that fails to compile never matches.
pub fn matches_str(path: &str, pattern: &str) -> bool {
    match Pattern::parse(pattern) {
        Ok(p) => matches(path, &p),
        Err(e) => {
            tracing::debug!(pattern = %pattern, error = %e, "Pattern failed to compile");
            false
        }
    }
}
