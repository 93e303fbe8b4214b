//! Matcher evaluation.
//!
//! # Responsibilities
//! - Check the request method against the allow-list (case-insensitive)
//! - Check the request path against the pattern list (case-sensitive)
//! - Combine both clauses with AND semantics
//!
//! # Design Decisions
//! - Absent clause = no constraint
//! - Present but empty clause = matches nothing
//! - Method is checked first; it is the cheaper rejection
//! - Building from raw JSON never fails; malformed entries are dropped and
//!   reported separately by `config::validation`

use serde_json::{Map, Value};

use crate::matching::pattern::{matches, Pattern, PatternError};
use crate::matching::request::RequestView;

/// Which requests a middleware applies to.
#[derive(Debug, Clone, Default)]
pub struct MatcherConfig {
    /// HTTP method allow-list. `None` allows every method.
    pub methods: Option<Vec<String>>,

    /// Path patterns, any of which may match. `None` allows every path.
    pub patterns: Option<Vec<Pattern>>,
}

impl MatcherConfig {
    /// A matcher that only constrains methods.
    pub fn methods<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: Some(methods.into_iter().map(Into::into).collect()),
            patterns: None,
        }
    }

    /// Add a pattern clause.
    pub fn with_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// A matcher that rejects every request.
    pub fn never() -> Self {
        Self {
            methods: Some(Vec::new()),
            patterns: None,
        }
    }

    /// Build from a raw matcher object as found in a manifest.
    ///
    /// - non-object matcher: never runs
    /// - `null` fields count as absent
    /// - non-array `methods` / `patterns`: that clause is empty
    /// - entries that are not strings (methods) or not strings/regex objects
    ///   (patterns) are dropped, as are patterns that fail to compile
    pub fn from_value(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::never();
        };

        let methods = field(obj, "methods").map(|v| match v.as_array() {
            Some(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        });

        let patterns = field(obj, "patterns").map(|v| match v.as_array() {
            Some(items) => items
                .iter()
                .filter_map(|item| pattern_from_value(item).and_then(Result::ok))
                .collect(),
            None => Vec::new(),
        });

        Self { methods, patterns }
    }
}

/// A matcher field, with `null` treated as absent.
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// Interpret one raw `patterns` entry. `None` means the entry has the wrong shape.
pub(crate) fn pattern_from_value(item: &Value) -> Option<Result<Pattern, PatternError>> {
    match item {
        Value::String(s) => Some(Pattern::parse(s)),
        Value::Object(obj) => {
            let source = obj.get("regex")?.as_str()?;
            let flags = match obj.get("flags") {
                None => "",
                Some(f) => f.as_str()?,
            };
            Some(Pattern::regex(source, flags))
        }
        _ => None,
    }
}

/// Decide whether a middleware guarded by `matcher` should run for `request`.
pub fn should_run<R: RequestView + ?Sized>(request: &R, matcher: Option<&MatcherConfig>) -> bool {
    let Some(matcher) = matcher else {
        return true;
    };

    if let Some(methods) = &matcher.methods {
        if methods.is_empty() {
            return false;
        }
        let method = request.method().to_uppercase();
        if !methods.iter().any(|m| m.to_uppercase() == method) {
            return false;
        }
    }

    if let Some(patterns) = &matcher.patterns {
        if patterns.is_empty() {
            return false;
        }
        let path = request.path();
        return patterns.iter().any(|p| matches(path, p));
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::request::IncomingRequest;
    use serde_json::json;

    fn req(method: &str, path: &str) -> IncomingRequest {
        IncomingRequest::new(method, &format!("http://example.com{path}")).unwrap()
    }

    fn globs(patterns: &[&str]) -> Vec<Pattern> {
        patterns.iter().map(|p| Pattern::parse(p).unwrap()).collect()
    }

    #[test]
    fn test_absent_matcher_always_runs() {
        assert!(should_run(&req("GET", "/"), None));
        assert!(should_run(&req("DELETE", "/x/y"), Some(&MatcherConfig::default())));
    }

    #[test]
    fn test_empty_methods_never_runs() {
        let m = MatcherConfig::methods(Vec::<String>::new()).with_patterns(globs(&["/**"]));
        assert!(!should_run(&req("GET", "/"), Some(&m)));
    }

    #[test]
    fn test_empty_patterns_never_runs() {
        let m = MatcherConfig::methods(["GET"]).with_patterns(Vec::new());
        assert!(!should_run(&req("GET", "/"), Some(&m)));
    }

    #[test]
    fn test_methods_case_insensitive() {
        let m = MatcherConfig::methods(["get"]);
        assert!(should_run(&req("GET", "/anything"), Some(&m)));
        assert!(should_run(&req("Get", "/anything"), Some(&m)));
        assert!(!should_run(&req("POST", "/anything"), Some(&m)));
    }

    #[test]
    fn test_method_and_pattern_both_required() {
        let m = MatcherConfig::methods(["POST"]).with_patterns(globs(&["/api"]));
        assert!(should_run(&req("POST", "/api"), Some(&m)));
        assert!(!should_run(&req("GET", "/api"), Some(&m)));
        assert!(!should_run(&req("POST", "/other"), Some(&m)));
    }

    #[test]
    fn test_any_pattern_wins() {
        let m = MatcherConfig::default().with_patterns(globs(&["/a", "/b/*", "/c/**"]));
        assert!(should_run(&req("GET", "/b/x"), Some(&m)));
        assert!(should_run(&req("GET", "/c/x/y"), Some(&m)));
        assert!(!should_run(&req("GET", "/d"), Some(&m)));
    }

    #[test]
    fn test_from_value() {
        let m = MatcherConfig::from_value(&json!({
            "methods": ["get", "POST"],
            "patterns": ["/api/*", { "regex": "^/auth/(login|logout)$" }]
        }));
        assert_eq!(m.methods.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(m.patterns.as_ref().map(Vec::len), Some(2));
        assert!(should_run(&req("GET", "/auth/login"), Some(&m)));
        assert!(!should_run(&req("PUT", "/auth/login"), Some(&m)));
    }

    #[test]
    fn test_from_value_empty_object_always_runs() {
        let m = MatcherConfig::from_value(&json!({}));
        assert!(should_run(&req("GET", "/"), Some(&m)));
    }

    #[test]
    fn test_from_value_drops_malformed_patterns() {
        let m = MatcherConfig::from_value(&json!({
            "patterns": [42, null, { "regex": "(" }, { "source": "/x" }, "/ok"]
        }));
        assert_eq!(m.patterns.as_ref().map(Vec::len), Some(1));
        assert!(should_run(&req("GET", "/ok"), Some(&m)));
    }

    #[test]
    fn test_from_value_only_malformed_patterns_never_runs() {
        let m = MatcherConfig::from_value(&json!({ "patterns": [1, 2] }));
        assert!(!should_run(&req("GET", "/"), Some(&m)));
    }

    #[test]
    fn test_from_value_non_array_methods_never_runs() {
        let m = MatcherConfig::from_value(&json!({ "methods": "GET" }));
        assert!(!should_run(&req("GET", "/"), Some(&m)));
    }

    #[test]
    fn test_from_value_null_fields_are_absent() {
        let m = MatcherConfig::from_value(&json!({ "methods": null, "patterns": null }));
        assert!(should_run(&req("GET", "/"), Some(&m)));
    }

    #[test]
    fn test_from_value_non_object_never_runs() {
        let m = MatcherConfig::from_value(&json!(["/api"]));
        assert!(!should_run(&req("GET", "/api"), Some(&m)));
    }

    #[test]
    fn test_idempotent() {
        let m = MatcherConfig::methods(["GET"]).with_patterns(globs(&["/api/**"]));
        let r = req("GET", "/api/a");
        let first = should_run(&r, Some(&m));
        for _ in 0..10 {
            assert_eq!(should_run(&r, Some(&m)), first);
        }
    }
}
