//! Tests for RAI resolution.
//!
//! # Test Coverage
//!
//! - Exact-match precedence: a fully literal path always beats a
//!   structurally-overlapping parameterized sibling
//! - Specificity ordering between parameterized templates
//! - Tie-break by declaration order on equal scores
//! - Trailing-slash tolerance on both layers
//! - Method partitioning and `NotFound` diagnostics
//! - The bounded FIFO resolution cache

use http::Method;
use rairouter::compiler::{compile, RouteTable};
use rairouter::dispatcher::{HandlerOutcome, HandlerResponse};
use rairouter::errors::RequestError;
use rairouter::matcher::Matcher;
use rairouter::tree::{Endpoint, Group};
use serde_json::json;

fn endpoint(method: Method, path: &str, rai: &str) -> Endpoint {
    Endpoint::new(method, path, rai)
        .role("admin")
        .handler(|_req| HandlerOutcome::Respond(HandlerResponse::json(200, json!({}))))
}

fn table(root: Group) -> RouteTable {
    compile(&root).expect("tree should compile")
}

fn assert_resolves(matcher: &Matcher, method: Method, path: &str, expected_rai: &str) {
    let rai = matcher
        .resolve(&method, path)
        .unwrap_or_else(|e| panic!("expected {method} {path} to resolve: {e}"));
    assert_eq!(
        rai.as_ref(),
        expected_rai,
        "RAI mismatch for {method} {path}"
    );
}

#[test]
fn test_exact_match_beats_parameterized_sibling() {
    // the parameterized sibling is declared first; exact still wins
    let root = Group::new("/items")
        .route(endpoint(Method::GET, "/:id", "items:read"))
        .route(endpoint(Method::GET, "/new", "items:new"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/items/new", "items:new");
    assert_resolves(&matcher, Method::GET, "/items/42", "items:read");
}

#[test]
fn test_higher_specificity_wins_between_dynamic_templates() {
    // /d/e/:y (two literals) outscores /d/:x/:y (one literal) even though
    // it is declared second
    let root = Group::new("/d")
        .route(endpoint(Method::GET, "/:x/:y", "d:loose"))
        .route(endpoint(Method::GET, "/e/:y", "d:tight"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/d/e/f", "d:tight");
    assert_resolves(&matcher, Method::GET, "/d/q/f", "d:loose");
}

#[test]
fn test_equal_scores_tie_break_on_declaration_order() {
    // lit/param/lit and lit/lit/param carry identical scores; both match
    // /zoo/alpha/feed, so the first-declared endpoint must win
    let root = Group::new("/zoo")
        .route(endpoint(Method::GET, "/:name/feed", "zoo:feed"))
        .route(endpoint(Method::GET, "/alpha/:action", "zoo:alpha"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/zoo/alpha/feed", "zoo:feed");
    // non-overlapping concrete paths still reach the right template
    assert_resolves(&matcher, Method::GET, "/zoo/beta/feed", "zoo:feed");
    assert_resolves(&matcher, Method::GET, "/zoo/alpha/pet", "zoo:alpha");
}

#[test]
fn test_wildcard_matches_remainder_and_scores_lowest() {
    let root = Group::new("/files")
        .route(endpoint(Method::GET, "/manifest", "files:manifest"))
        .route(endpoint(Method::GET, "/:name", "files:one"))
        .route(endpoint(Method::GET, "/*", "files:tree"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/files/manifest", "files:manifest");
    assert_resolves(&matcher, Method::GET, "/files/a.txt", "files:one");
    assert_resolves(&matcher, Method::GET, "/files/a/b/c.txt", "files:tree");
}

#[test]
fn test_trailing_slash_tolerated_on_static_paths() {
    let root = Group::new("/posts").route(endpoint(Method::GET, "/new", "posts:new"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/posts/new", "posts:new");
    assert_resolves(&matcher, Method::GET, "/posts/new/", "posts:new");
}

#[test]
fn test_trailing_slash_tolerated_on_dynamic_paths() {
    let root = Group::new("/posts").route(endpoint(Method::GET, "/:id", "posts:read"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/posts/42/", "posts:read");
}

#[test]
fn test_methods_partition_the_pattern_lists() {
    let root = Group::new("/posts")
        .route(endpoint(Method::GET, "/:id", "posts:read"))
        .route(endpoint(Method::PUT, "/:id", "posts:update"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/posts/7", "posts:read");
    assert_resolves(&matcher, Method::PUT, "/posts/7", "posts:update");
    assert!(matcher.resolve(&Method::POST, "/posts/7").is_err());
}

#[test]
fn test_not_found_lists_known_paths_for_the_method() {
    let root = Group::new("")
        .route(endpoint(Method::DELETE, "/posts/:id", "posts:delete"))
        .route(endpoint(Method::DELETE, "/users/:id", "users:delete"))
        .route(endpoint(Method::GET, "/posts", "posts:list"));
    let matcher = Matcher::from_table(&table(root), 16);

    let err = matcher
        .resolve(&Method::DELETE, "/nonexistent")
        .unwrap_err();
    match err {
        RequestError::NotFound {
            method,
            path,
            known_paths,
        } => {
            assert_eq!(method, Method::DELETE);
            assert_eq!(path, "/nonexistent");
            assert_eq!(known_paths, vec!["/posts/:id", "/users/:id"]);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_dynamic_resolutions_are_memoized() {
    let root = Group::new("/things").route(endpoint(Method::GET, "/:id", "things:read"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/things/1", "things:read");
    assert_resolves(&matcher, Method::GET, "/things/1", "things:read");

    let stats = matcher.cache_stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_static_resolutions_bypass_the_cache() {
    let root = Group::new("/posts").route(endpoint(Method::GET, "/new", "posts:new"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/posts/new", "posts:new");
    assert_resolves(&matcher, Method::GET, "/posts/new", "posts:new");
    assert_eq!(matcher.cache_stats().size, 0);
}

#[test]
fn test_cache_never_exceeds_its_bound() {
    let root = Group::new("/things").route(endpoint(Method::GET, "/:id", "things:read"));
    let matcher = Matcher::from_table(&table(root), 1000);

    for i in 0..1100 {
        assert_resolves(&matcher, Method::GET, &format!("/things/{i}"), "things:read");
    }

    let stats = matcher.cache_stats();
    assert_eq!(stats.size, 1000);
    assert_eq!(stats.capacity, 1000);
    assert_eq!(stats.evictions, 100);
}

#[test]
fn test_cache_evicts_least_recently_inserted_first() {
    let root = Group::new("/things").route(endpoint(Method::GET, "/:id", "things:read"));
    let matcher = Matcher::from_table(&table(root), 3);

    for i in 0..4 {
        assert_resolves(&matcher, Method::GET, &format!("/things/{i}"), "things:read");
    }

    let misses_before = matcher.cache_stats().misses;
    // /things/0 was inserted first, so it is the one evicted: resolving it
    // again misses the cache (but still resolves via the pattern list)
    assert_resolves(&matcher, Method::GET, "/things/0", "things:read");
    assert_eq!(matcher.cache_stats().misses, misses_before + 1);

    // /things/3 is still cached
    let hits_before = matcher.cache_stats().hits;
    assert_resolves(&matcher, Method::GET, "/things/3", "things:read");
    assert_eq!(matcher.cache_stats().hits, hits_before + 1);
}

#[test]
fn test_root_path_resolves() {
    let root = Group::new("").route(endpoint(Method::GET, "/", "root:index"));
    let matcher = Matcher::from_table(&table(root), 16);

    assert_resolves(&matcher, Method::GET, "/", "root:index");
}
