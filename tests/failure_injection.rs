//! Failure injection tests for the session proxy.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, config_for, dead_addr, set_cookies, start_proxy, start_upstream, MockReply};

#[tokio::test]
async fn test_connection_refused_returns_502() {
    let addr = dead_addr().await;
    let proxy = start_proxy(config_for(&format!("http://{}", addr))).await;

    let res = client()
        .get(proxy.url("/api/me"))
        .header("cookie", "access_token=abc")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(set_cookies(&res).is_empty());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(!body["data"]["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_timeout_returns_502() {
    let upstream = start_upstream(|| {
        MockReply::json(200, json!({ "success": true })).with_delay(Duration::from_secs(3))
    })
    .await;

    let mut config = config_for(&upstream.base_url());
    config.timeouts.upstream_secs = 1;
    config.timeouts.request_secs = 5;
    let proxy = start_proxy(config).await;

    let res = client().get(proxy.url("/api/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["data"]["detail"].is_string());

    // Exactly one attempt, no retries
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    let addr = dead_addr().await;
    let proxy = start_proxy(config_for(&format!("http://{}", addr))).await;
    let client = client();

    let first = client.get(proxy.url("/api/me")).send().await.unwrap();
    let second = client.get(proxy.url("/api/me")).send().await.unwrap();
    assert_eq!(first.status(), second.status());

    let first: Value = first.json().await.unwrap();
    let second: Value = second.json().await.unwrap();
    assert_eq!(first["message"], second["message"]);
}

#[tokio::test]
async fn test_unbuildable_upstream_url_returns_500() {
    // Validation would reject this; the server must still fail closed
    let proxy = start_proxy(config_for("http://bad host")).await;

    let res = client().get(proxy.url("/api/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "success": false, "message": "Internal server error", "data": null })
    );
}

#[tokio::test]
async fn test_upstream_5xx_is_relayed_not_replaced() {
    let upstream = start_upstream(|| {
        MockReply::json(503, json!({ "success": false, "message": "maintenance" }))
            .with_cookie("access_token=; Max-Age=0; Path=/")
    })
    .await;
    let proxy = start_proxy(config_for(&upstream.base_url())).await;

    let res = client().get(proxy.url("/api/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(set_cookies(&res), vec!["access_token=; Max-Age=0; Path=/".to_string()]);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("maintenance"));
}
