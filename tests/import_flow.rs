//! End-to-end tests for the import resolution flow.

use std::fs;

use axum::Router;
use tower_http::services::ServeDir;

use vanity_server::store::JsonStore;

mod common;

// Records keyed on the loopback host so the default Host header sent by
// the client matches (the lookup key drops the port).
const DB: &str = r#"[
{"prefix":"127.0.0.1/x","vcs":"git","root":"https://example.com/x","proxy":""},
{"prefix":"127.0.0.1/p","vcs":"git","root":"https://example.com/p","proxy":"https://proxy.golang.org/"},
{}]"#;

#[tokio::test]
async fn test_tool_request_gets_meta_tag() {
    let db = common::json_db(DB);
    let (addr, _shutdown) = common::spawn_server(
        common::test_config(),
        vec![Box::new(JsonStore::from_path(db.path()))],
        None,
    )
    .await;

    let res = reqwest::get(format!("http://{addr}/x?go-get=1")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/html"));

    let body = res.text().await.unwrap();
    assert!(body.contains(r#"<meta name="go-import" content="127.0.0.1/x git https://example.com/x">"#));
    assert!(!body.contains("http-equiv=\"refresh\""));
}

#[tokio::test]
async fn test_browser_request_gets_redirect() {
    let db = common::json_db(DB);
    let (addr, _shutdown) = common::spawn_server(
        common::test_config(),
        vec![Box::new(JsonStore::from_path(db.path()))],
        None,
    )
    .await;

    let body = reqwest::get(format!("http://{addr}/x"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("http-equiv=\"refresh\""));
    assert!(body.contains("Redirecting . . ."));
}

#[tokio::test]
async fn test_proxy_record_renders_mod_form() {
    let db = common::json_db(DB);
    let (addr, _shutdown) = common::spawn_server(
        common::test_config(),
        vec![Box::new(JsonStore::from_path(db.path()))],
        None,
    )
    .await;

    let body = reqwest::get(format!("http://{addr}/p?go-get=1"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"<meta name="go-import" content="127.0.0.1/p mod https://proxy.golang.org/">"#));
}

#[tokio::test]
async fn test_subpath_of_known_prefix_is_404() {
    let db = common::json_db(DB);
    let (addr, _shutdown) = common::spawn_server(
        common::test_config(),
        vec![Box::new(JsonStore::from_path(db.path()))],
        None,
    )
    .await;

    let res = reqwest::get(format!("http://{addr}/x/sub")).await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "Not Found");
}

#[tokio::test]
async fn test_miss_is_served_by_static_fallback() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hello.txt"), "hello fallback").unwrap();

    let fallback = Router::new().fallback_service(ServeDir::new(dir.path()));
    let (addr, _shutdown) =
        common::spawn_server(common::test_config(), Vec::new(), Some(fallback)).await;

    let res = reqwest::get(format!("http://{addr}/hello.txt")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "hello fallback");

    let res = reqwest::get(format!("http://{addr}/missing.txt")).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_healthz_bypasses_resolution() {
    let (addr, _shutdown) = common::spawn_server(common::test_config(), Vec::new(), None).await;

    let res = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_rate_limit_answers_429() {
    let mut config = common::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst_size = 2;

    let (addr, _shutdown) = common::spawn_server(config, Vec::new(), None).await;

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let res = client
            .get(format!("http://{addr}/anything"))
            .send()
            .await
            .unwrap();
        statuses.push(res.status().as_u16());
    }

    assert_eq!(statuses[0], 404);
    assert_eq!(statuses[1], 404);
    assert_eq!(statuses[2], 429);
}
