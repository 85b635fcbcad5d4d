//! Configured relay routes: sign-in style POSTs and route overrides.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use session_proxy::config::{RelayRouteConfig, RouteMethod};

mod common;

use common::{client, config_for, set_cookies, start_proxy, start_upstream, MockReply};

fn route(name: &str, method: RouteMethod, path: &str, upstream_path: &str) -> RelayRouteConfig {
    RelayRouteConfig {
        name: name.into(),
        method,
        path: path.into(),
        upstream_path: upstream_path.into(),
    }
}

#[tokio::test]
async fn test_login_forwards_body_and_relays_cookies() {
    let upstream = start_upstream(|| {
        MockReply::json(200, json!({ "success": true, "message": "Logged in" }))
            .with_cookie("access_token=a1; Max-Age=900; Path=/; HttpOnly")
            .with_cookie("refresh_token=r1; Max-Age=604800; Path=/api/auth; HttpOnly")
    })
    .await;

    let mut config = config_for(&upstream.base_url());
    config.routes.push(route("login", RouteMethod::Post, "/api/auth/login", "/api/auth/login"));
    let proxy = start_proxy(config).await;

    let payload = json!({ "email": "ana@example.org", "password": "hunter2" });
    let res = client()
        .post(proxy.url("/api/auth/login"))
        .header("cookie", "csrf=tok")
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        set_cookies(&res),
        vec![
            "access_token=a1; Max-Age=900; Path=/; HttpOnly".to_string(),
            "refresh_token=r1; Max-Age=604800; Path=/api/auth; HttpOnly".to_string(),
        ]
    );

    let seen = upstream.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/api/auth/login");
    assert_eq!(seen[0].cookies, vec!["csrf=tok".to_string()]);
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(serde_json::from_str::<Value>(&seen[0].body).unwrap(), payload);
}

#[tokio::test]
async fn test_session_route_survives_extra_routes() {
    let upstream = start_upstream(|| MockReply::json(200, json!({ "success": true }))).await;

    let mut config = config_for(&upstream.base_url());
    config.routes.push(route("logout", RouteMethod::Post, "/api/auth/logout", "/api/auth/logout"));
    let proxy = start_proxy(config).await;

    let res = client().get(proxy.url("/api/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(upstream.requests()[0].path, "/api/auth/me");
}

#[tokio::test]
async fn test_session_route_override() {
    let upstream = start_upstream(|| MockReply::json(200, json!({ "success": true }))).await;

    let mut config = config_for(&upstream.base_url());
    config.routes.push(route("me", RouteMethod::Get, "/api/me", "/v2/session"));
    let proxy = start_proxy(config).await;

    client().get(proxy.url("/api/me")).send().await.unwrap();
    assert_eq!(upstream.requests()[0].path, "/v2/session");
}

#[tokio::test]
async fn test_oversized_body_rejected_before_upstream() {
    let upstream = start_upstream(|| MockReply::json(200, json!({}))).await;

    let mut config = config_for(&upstream.base_url());
    config.limits.max_body_size = 16;
    config.routes.push(route("signup", RouteMethod::Post, "/api/auth/signup", "/api/auth/signup"));
    let proxy = start_proxy(config).await;

    let res = client()
        .post(proxy.url("/api/auth/signup"))
        .json(&json!({ "email": "someone-with-a-long-address@example.org" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_get_route_does_not_forward_body() {
    let upstream = start_upstream(|| MockReply::json(200, json!({}))).await;
    let proxy = start_proxy(config_for(&upstream.base_url())).await;

    client()
        .get(proxy.url("/api/me"))
        .body("ignored")
        .send()
        .await
        .unwrap();

    let seen = upstream.requests();
    assert_eq!(seen[0].body, "");
    assert_eq!(seen[0].content_type, None);
}
