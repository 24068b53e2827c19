use super::Router;
use crate::spec::{enumerate_operations, parse_document};
use http::Method;
use serde_json::json;

fn router(doc: serde_json::Value) -> Router {
    Router::new(enumerate_operations(&parse_document(&doc).unwrap()))
}

#[test]
fn test_root_path() {
    let (re, params) = Router::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = Router::path_to_regex("/items/:id").unwrap();
    assert!(re.is_match("/items/123"));
    assert!(re.is_match("/items/123/"));
    assert!(!re.is_match("/items/123/x"));
    assert_eq!(params, vec!["id"]);
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _) = Router::path_to_regex("/v1.0/items").unwrap();
    assert!(re.is_match("/v1.0/items"));
    assert!(!re.is_match("/v1x0/items"));
}

#[test]
fn test_route_extracts_params() {
    let r = router(json!({
        "paths": { "/articles/{slug}/comments/{id}": { "delete": {}, "get": {} } }
    }));
    let m = r
        .route(Method::DELETE, "/articles/hello%20world/comments/7")
        .unwrap();
    assert_eq!(m.route.route, "/articles/:slug/comments/:id");
    assert_eq!(m.get_path_param("slug"), Some("hello world"));
    assert_eq!(m.get_path_param("id"), Some("7"));
    assert!(r.route(Method::POST, "/articles/a/comments/1").is_none());
}

#[test]
fn test_static_segment_wins_over_capture() {
    let r = router(json!({
        "paths": {
            "/articles/{slug}": { "get": {} },
            "/articles/feed": { "get": {} }
        }
    }));
    let m = r.route(Method::GET, "/articles/feed").unwrap();
    assert_eq!(m.route.path_pattern, "/articles/feed");
    let m = r.route(Method::GET, "/articles/other").unwrap();
    assert_eq!(m.route.path_pattern, "/articles/{slug}");
}

#[test]
fn test_routes_per_server() {
    let r = router(json!({
        "servers": [{ "url": "/v1" }, { "url": "https://example.com/v2/" }],
        "paths": { "/tags": { "get": {} } }
    }));
    assert_eq!(r.len(), 2);
    assert!(r.route(Method::GET, "/v1/tags").is_some());
    assert!(r.route(Method::GET, "/v2/tags").is_some());
    assert!(r.route(Method::GET, "/tags").is_none());
}

#[test]
fn test_capture_with_literal_suffix() {
    let (re, params) = Router::path_to_regex("/files/:name.json").unwrap();
    assert_eq!(params, vec!["name"]);
    assert!(re.is_match("/files/report.json"));
    assert!(!re.is_match("/files/report.yaml"));

    let r = router(json!({ "paths": { "/files/{name}.json": { "get": {} } } }));
    let m = r.route(Method::GET, "/files/report.json").unwrap();
    assert_eq!(m.route.route, "/files/:name.json");
    assert_eq!(m.get_path_param("name"), Some("report"));
}

#[test]
fn test_two_captures_in_one_segment() {
    let (re, params) = Router::path_to_regex("/tiles/:x-:y").unwrap();
    assert_eq!(params, vec!["x", "y"]);
    let caps = re.captures("/tiles/3-4").unwrap();
    assert_eq!(&caps[1], "3");
    assert_eq!(&caps[2], "4");
}
