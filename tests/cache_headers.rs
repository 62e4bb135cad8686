//! End-to-end: every response carries the cache policy of its path's
//! extension, whatever its status.

mod common;

use common::TestServer;
use hyper::header::{
    HeaderMap, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, LAST_MODIFIED, LOCATION, PRAGMA,
};
use hyper::{Method, StatusCode};

const CACHEABLE: &str = "public, max-age=3600";
const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

fn assert_cacheable(headers: &HeaderMap) {
    assert_eq!(headers.get_all(CACHE_CONTROL).iter().count(), 1);
    assert_eq!(headers[CACHE_CONTROL], CACHEABLE);
    assert!(headers.get(PRAGMA).is_none(), "cacheable response has Pragma");
    assert!(headers.get(EXPIRES).is_none(), "cacheable response has Expires");
}

fn assert_no_cache(headers: &HeaderMap) {
    assert_eq!(headers.get_all(CACHE_CONTROL).iter().count(), 1);
    assert_eq!(headers[CACHE_CONTROL], NO_CACHE);
    assert_eq!(headers[PRAGMA], "no-cache");
    assert_eq!(headers[EXPIRES], "0");
}

#[tokio::test]
async fn existing_script_is_cacheable() {
    let server = TestServer::start(&[("app.js", "console.log('hi');")]).await;

    let resp = server.get("/app.js").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), b"console.log('hi');");
    assert_cacheable(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn html_page_is_not_cached() {
    let server = TestServer::start(&[("index.html", "<h1>home</h1>")]).await;

    let resp = server.get("/index.html").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    assert!(resp.headers().contains_key(LAST_MODIFIED));
    assert_no_cache(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn missing_stylesheet_still_cacheable() {
    let server = TestServer::start(&[]).await;

    let resp = server.get("/missing.css").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(String::from_utf8_lossy(resp.body()).contains("File not found"));
    assert_cacheable(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn extensionless_path_is_not_cached() {
    let server = TestServer::start(&[("data", "raw")]).await;

    let resp = server.get("/data").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/octet-stream");
    assert_no_cache(resp.headers());

    server.stop().await;

    let server = TestServer::start(&[]).await;
    let resp = server.get("/data").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_no_cache(resp.headers());
    server.stop().await;
}

#[tokio::test]
async fn svg_and_query_strings() {
    let server = TestServer::start(&[("img/logo.svg", "<svg/>")]).await;

    let resp = server.get("/img/logo.svg?v=42").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "image/svg+xml");
    assert_cacheable(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn extension_match_is_case_sensitive() {
    let server = TestServer::start(&[("APP.JS", "1")]).await;

    let resp = server.get("/APP.JS").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_no_cache(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn configured_rules_replace_defaults() {
    let server = TestServer::start_with(&[("font.WOFF2", "wOF2"), ("app.js", "1")], |cfg| {
        cfg.cache.extensions = vec![".woff2".to_string()];
        cfg.cache.max_age = 86400;
        cfg.cache.case_insensitive = true;
    })
    .await;

    let resp = server.get("/font.WOFF2").await;
    assert_eq!(resp.headers()[CACHE_CONTROL], "public, max-age=86400");
    assert!(resp.headers().get(PRAGMA).is_none());

    let resp = server.get("/app.js").await;
    assert_no_cache(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn directories_redirect_then_list() {
    let server = TestServer::start(&[("static/site.css", "body{}")]).await;

    let resp = server.get("/static").await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers()[LOCATION], "/static/");
    assert_no_cache(resp.headers());

    let resp = server.get("/static/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = String::from_utf8_lossy(resp.body()).into_owned();
    assert!(page.contains("Directory listing for /static/"));
    assert!(page.contains("<a href=\"site.css\">site.css</a>"));
    assert_no_cache(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn directory_index_keeps_directory_policy() {
    let server = TestServer::start(&[("index.html", "<p>root</p>")]).await;

    let resp = server.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), b"<p>root</p>");
    assert_no_cache(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn traversal_cannot_escape_root() {
    let server = TestServer::start(&[("public.txt", "ok")]).await;
    common::write_file(server.root.path().parent().unwrap(), "cachebox-secret.js", b"no");

    let resp = server.get("/../cachebox-secret.js").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_cacheable(resp.headers());

    let _ = std::fs::remove_file(server.root.path().parent().unwrap().join("cachebox-secret.js"));
    server.stop().await;
}

#[tokio::test]
async fn head_and_unsupported_methods() {
    let server = TestServer::start(&[("app.css", "a{}")]).await;

    let resp = server.request(Method::HEAD, "/app.css", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.body().is_empty());
    assert_eq!(resp.headers()["content-length"], "3");
    assert_cacheable(resp.headers());

    let resp = server.request(Method::POST, "/app.css", &[]).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    assert_cacheable(resp.headers());

    let resp = server.request(Method::PUT, "/form", &[]).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    assert_no_cache(resp.headers());

    server.stop().await;
}

#[tokio::test]
async fn conditional_get_returns_304_with_policy() {
    let server = TestServer::start(&[("app.js", "1"), ("page.html", "2")]).await;

    let resp = server.get("/app.js").await;
    let last_modified = resp.headers()[LAST_MODIFIED].to_str().unwrap().to_string();

    let resp = server
        .request(Method::GET, "/app.js", &[("if-modified-since", last_modified.as_str())])
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert!(resp.body().is_empty());
    assert_cacheable(resp.headers());

    let resp = server.get("/page.html").await;
    let last_modified = resp.headers()[LAST_MODIFIED].to_str().unwrap().to_string();
    let resp = server
        .request(Method::GET, "/page.html", &[("if-modified-since", last_modified.as_str())])
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_no_cache(resp.headers());

    server.stop().await;
}
