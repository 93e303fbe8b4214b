//! Glob compilation.
//!
//! # Responsibilities
//! - Split a glob on `/` into segments
//! - Classify each segment into a [`SegmentRule`] by content and position
//! - Render the rules as one anchored regular expression
//!
//! # Design Decisions
//! - The dialect is `*` and `**` only; no character classes, no braces
//! - Every rule is a named enum variant so the table can be tested on its own
//! - `*` never crosses a `/`; only `**` spans segments
//! - Literal text is escaped before it reaches the regex engine

use regex::Regex;

use crate::matching::pattern::PatternError;

/// Matches zero or more characters inside one segment.
const IN_SEGMENT: &str = "[^/]*";

/// How one pattern segment is matched against the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRule {
    /// `/**` on its own: every path, including `/`.
    AnyPath,
    /// Leading `**` followed by more segments: one or more path segments.
    LeadingDeep,
    /// Interior or trailing `**`: zero or more path segments.
    OptionalDeep,
    /// `*` in the first or an interior position: exactly one non-empty segment.
    Single,
    /// `*` as the last of several segments: the base path, or the base plus one segment.
    OptionalSingle,
    /// `/*` on its own: the root, or exactly one segment.
    RootOrSingle,
    /// `text**`: a segment starting with `text`, optionally with deeper segments below.
    PrefixDeep(Vec<String>),
    /// A segment with interior `*`s. Holds the literal pieces between them.
    Partial(Vec<String>),
    /// No wildcard at all.
    Literal(String),
}

impl SegmentRule {
    fn classify(segment: &str, index: usize, count: usize) -> Self {
        let first = index == 0;
        let last = index + 1 == count;

        match segment {
            "**" if count == 1 => SegmentRule::AnyPath,
            "**" if first => SegmentRule::LeadingDeep,
            "**" => SegmentRule::OptionalDeep,
            "*" if count == 1 => SegmentRule::RootOrSingle,
            "*" if last => SegmentRule::OptionalSingle,
            "*" => SegmentRule::Single,
            s if s.len() > 2 && s.ends_with("**") => {
                let prefix = s.trim_end_matches('*');
                SegmentRule::PrefixDeep(split_pieces(prefix))
            }
            s if s.contains('*') => SegmentRule::Partial(split_pieces(s)),
            s => SegmentRule::Literal(s.to_string()),
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            SegmentRule::AnyPath => out.push_str(".*"),
            SegmentRule::LeadingDeep => out.push_str("(?:/[^/]+)+"),
            SegmentRule::OptionalDeep => out.push_str("(?:/[^/]*)*"),
            SegmentRule::Single => out.push_str("/[^/]+"),
            SegmentRule::OptionalSingle => out.push_str("(?:/[^/]+)?"),
            SegmentRule::RootOrSingle => out.push_str("/(?:[^/]+)?"),
            SegmentRule::PrefixDeep(pieces) => {
                out.push('/');
                push_pieces(out, pieces);
                out.push_str(IN_SEGMENT);
                out.push_str("(?:/[^/]*)*");
            }
            SegmentRule::Partial(pieces) => {
                out.push('/');
                push_pieces(out, pieces);
            }
            SegmentRule::Literal(text) => {
                out.push('/');
                out.push_str(&regex::escape(text));
            }
        }
    }
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    rules: Vec<SegmentRule>,
    regex: Regex,
}

impl Glob {
    /// Compile a glob into its segment rules and anchored regex.
    ///
    /// A pattern without a leading `/` is treated as rooted.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let trimmed = source.strip_prefix('/').unwrap_or(source);
        let segments: Vec<&str> = trimmed.split('/').collect();
        let count = segments.len();

        let rules: Vec<SegmentRule> = segments
            .iter()
            .enumerate()
            .map(|(i, s)| SegmentRule::classify(s, i, count))
            .collect();

        let mut expr = String::with_capacity(source.len() * 2 + 2);
        expr.push('^');
        for rule in &rules {
            rule.render(&mut expr);
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| PatternError::InvalidRegex {
            pattern: expr.clone(),
            source: e,
        })?;

        tracing::trace!(glob = %source, regex = %expr, "Compiled glob");

        Ok(Self {
            source: source.to_string(),
            rules,
            regex,
        })
    }

    /// The glob as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The per-segment rules, in pattern order.
    pub fn rules(&self) -> &[SegmentRule] {
        &self.rules
    }

    /// The generated regular expression.
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Test the compiled expression. Does not check exact equality with the source.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

fn split_pieces(segment: &str) -> Vec<String> {
    segment.split('*').map(str::to_string).collect()
}

fn push_pieces(out: &mut String, pieces: &[String]) {
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 {
            out.push_str(IN_SEGMENT);
        }
        out.push_str(&regex::escape(piece));
    }
}
