//! End-to-end forwarding tests for the authenticating proxy.
//!
//! Each test runs the real server against a raw-TCP mock upstream and
//! asserts on what actually crosses the wire.

use authgate::config::{AuthMode, ProxyConfig};
use axum::http::StatusCode;

mod common;

fn config(target: &str, mode: AuthMode) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.url = target.to_string();
    config.auth.mode = mode;
    config.observability.metrics_enabled = false;
    config
}

#[tokio::test]
async fn fixed_query_is_merged_ahead_of_the_inbound_query() {
    let (upstream_addr, upstream) = common::start_recording_upstream("upstream-ok").await;
    let target = format!("http://{}/api?key=abc", upstream_addr);
    let (proxy_addr, shutdown) = common::start_proxy(config(&target, AuthMode::Allow)).await;

    let res = common::test_client()
        .get(format!("http://{}/search?q=cats", proxy_addr))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "upstream-ok");
    assert_eq!(
        upstream.request_lines(),
        ["GET /api?key=abc&q=cats HTTP/1.1"]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn empty_queries_produce_a_bare_target_path() {
    let (upstream_addr, upstream) = common::start_recording_upstream("upstream-ok").await;
    let target = format!("http://{}/api", upstream_addr);
    let (proxy_addr, shutdown) = common::start_proxy(config(&target, AuthMode::Allow)).await;

    let res = common::test_client()
        .get(format!("http://{}/search", proxy_addr))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(upstream.request_lines(), ["GET /api HTTP/1.1"]);

    shutdown.trigger();
}

#[tokio::test]
async fn deny_all_answers_401_without_touching_the_upstream() {
    let (upstream_addr, upstream) = common::start_recording_upstream("upstream-ok").await;
    let target = format!("http://{}/api", upstream_addr);
    // Deny is the default mode.
    let (proxy_addr, shutdown) = common::start_proxy(config(&target, AuthMode::Deny)).await;

    let res = common::test_client()
        .get(format!("http://{}/anything?q=1", proxy_addr))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(res.headers()["content-length"], "0");
    assert_eq!(res.text().await.unwrap(), "");
    assert_eq!(upstream.hits(), 0, "denied request must not reach upstream");

    shutdown.trigger();
}

#[tokio::test]
async fn bearer_mode_admits_only_the_configured_token() {
    let (upstream_addr, upstream) = common::start_recording_upstream("upstream-ok").await;
    let target = format!("http://{}/api", upstream_addr);
    let mut config = config(&target, AuthMode::Bearer);
    config.auth.bearer_token = "s3cret".to_string();
    let (proxy_addr, shutdown) = common::start_proxy(config).await;

    let client = common::test_client();
    let url = format!("http://{}/data", proxy_addr);

    let accepted = client
        .get(&url)
        .header("authorization", "Bearer s3cret")
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(accepted.status(), 200);
    assert_eq!(upstream.hits(), 1);

    let rejected = client
        .get(&url)
        .header("authorization", "Bearer wrong")
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(upstream.hits(), 1, "rejected token must not reach upstream");

    let missing = client.get(&url).send().await.expect("proxy unreachable");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(upstream.hits(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_upstream_maps_to_502() {
    // Bind a port, then drop the listener so nothing serves it.
    let dead_addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let target = format!("http://{}/api", dead_addr);
    let (proxy_addr, shutdown) = common::start_proxy(config(&target, AuthMode::Allow)).await;

    let res = common::test_client()
        .get(format!("http://{}/search", proxy_addr))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY.as_u16());

    shutdown.trigger();
}

#[tokio::test]
async fn request_id_is_attached_before_forwarding() {
    let (upstream_addr, upstream) = common::start_recording_upstream("upstream-ok").await;
    let target = format!("http://{}/api", upstream_addr);
    let (proxy_addr, shutdown) = common::start_proxy(config(&target, AuthMode::Allow)).await;

    common::test_client()
        .get(format!("http://{}/search", proxy_addr))
        .send()
        .await
        .expect("proxy unreachable");

    let heads = upstream.heads();
    assert_eq!(heads.len(), 1);
    assert!(
        heads[0].to_lowercase().contains("x-request-id:"),
        "forwarded request should carry a request ID, got:\n{}",
        heads[0]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn inbound_method_and_body_pass_through() {
    let (upstream_addr, upstream) = common::start_recording_upstream("upstream-ok").await;
    let target = format!("http://{}/api?key=abc", upstream_addr);
    let (proxy_addr, shutdown) = common::start_proxy(config(&target, AuthMode::Allow)).await;

    let res = common::test_client()
        .post(format!("http://{}/submit?id=7", proxy_addr))
        .body("payload")
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(upstream.request_lines(), ["POST /api?key=abc&id=7 HTTP/1.1"]);

    shutdown.trigger();
}
