//! End-to-end matcher scenarios driven from raw manifest matchers.

use middleware_gate::matching::{should_run, IncomingRequest, MatcherConfig, Pattern};
use serde_json::json;

fn req(method: &str, url: &str) -> IncomingRequest {
    IncomingRequest::new(method, url).unwrap()
}

fn run(matcher: serde_json::Value, method: &str, path: &str) -> bool {
    let config = MatcherConfig::from_value(&matcher);
    should_run(&req(method, &format!("https://example.com{path}")), Some(&config))
}

#[test]
fn test_catch_all() {
    let m = json!({ "patterns": ["/**"] });
    assert!(run(m.clone(), "GET", "/"));
    assert!(run(m, "GET", "/api/x/y"));
}

#[test]
fn test_trailing_single_wildcard() {
    let m = json!({ "patterns": ["/api/*"] });
    assert!(run(m.clone(), "GET", "/api"));
    assert!(run(m.clone(), "GET", "/api/users"));
    assert!(!run(m, "GET", "/api/users/1"));
}

#[test]
fn test_method_and_pattern() {
    let m = json!({ "methods": ["POST"], "patterns": ["/api"] });
    assert!(run(m.clone(), "POST", "/api"));
    assert!(!run(m, "GET", "/api"));
}

#[test]
fn test_regex_pattern() {
    let config = MatcherConfig::default()
        .with_patterns(vec![Pattern::regex(r"^/auth/(login|logout)$", "").unwrap()]);
    assert!(should_run(&req("GET", "http://h/auth/login"), Some(&config)));
    assert!(!should_run(&req("GET", "http://h/auth/register"), Some(&config)));
}

#[test]
fn test_trailing_slash_literal() {
    let m = json!({ "patterns": ["/api/"] });
    assert!(run(m.clone(), "GET", "/api/"));
    assert!(!run(m, "GET", "/api"));
}

#[test]
fn test_query_and_fragment_ignored() {
    let m = json!({ "patterns": ["/api"] });
    assert!(run(m.clone(), "GET", "/api?x=1"));
    assert!(run(m.clone(), "GET", "/api#frag"));
    assert!(run(m, "GET", "/api?x=1#frag"));
}

#[test]
fn test_patterns_case_sensitive() {
    let m = json!({ "patterns": ["/Api/*"] });
    assert!(!run(m.clone(), "GET", "/api/users"));
    assert!(run(m, "GET", "/Api/users"));
}

#[test]
fn test_empty_clauses_never_run() {
    for method in ["GET", "POST", "DELETE"] {
        assert!(!run(json!({ "methods": [] }), method, "/"));
        assert!(!run(json!({ "methods": [], "patterns": ["/**"] }), method, "/"));
        assert!(!run(json!({ "patterns": [] }), method, "/"));
        assert!(!run(json!({ "methods": [method], "patterns": [] }), method, "/"));
    }
}

#[test]
fn test_absent_clauses_always_run() {
    for path in ["/", "/api", "/a/b/c/"] {
        assert!(run(json!({}), "OPTIONS", path));
        assert!(should_run(&req("GET", &format!("http://h{path}")), None));
    }
}

#[test]
fn test_mixed_wildcards() {
    let m = json!({ "patterns": ["/**/*.json"] });
    assert!(run(m.clone(), "GET", "/data/items.json"));
    assert!(run(m.clone(), "GET", "/a/b/items.json"));
    assert!(!run(m, "GET", "/items.json"));
}
