mod common;

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use campus::campus_config::RateLimitConfig;
use campus::router::init_router;
use common::{TestApp, json_request, lazy_pool};
use serde_json::json;
use tower::ServiceExt;

fn app_with_rate_limit(rate_limit_config: RateLimitConfig) -> Router {
    let mut state = TestApp::new(lazy_pool()).state;
    state.rate_limit_config = rate_limit_config;
    init_router(state)
}

/// One auth request per bucket, generous general limits
fn strict_auth_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        general_per_second: 60,
        general_burst_size: 10,
        auth_per_second: 60,
        auth_burst_size: 1,
    }
}

fn from_peer(mut request: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
    request
}

fn login_request(ip: [u8; 4]) -> Request<Body> {
    from_peer(
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nobody@test.com", "password": "password123" }),
        ),
        ip,
    )
}

#[tokio::test]
async fn test_auth_rate_limit_exceeded() {
    let app = app_with_rate_limit(strict_auth_config());

    let first = app.clone().oneshot(login_request([10, 0, 0, 1])).await.unwrap();
    assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

    let second = app.oneshot(login_request([10, 0, 0, 1])).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_auth_rate_limit_is_per_peer() {
    let app = app_with_rate_limit(strict_auth_config());

    let first = app.clone().oneshot(login_request([10, 0, 0, 2])).await.unwrap();
    assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

    let other_peer = app.oneshot(login_request([10, 0, 0, 3])).await.unwrap();
    assert_ne!(other_peer.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_auth_limit_does_not_apply_to_logout() {
    let app = app_with_rate_limit(strict_auth_config());

    for _ in 0..3 {
        let request = from_peer(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
            [10, 0, 0, 4],
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_general_rate_limit_exceeded() {
    let app = app_with_rate_limit(RateLimitConfig {
        enabled: true,
        general_per_second: 60,
        general_burst_size: 2,
        auth_per_second: 60,
        auth_burst_size: 5,
    });

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let request = from_peer(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
            [10, 0, 0, 5],
        );
        statuses.push(app.clone().oneshot(request).await.unwrap().status());
    }

    assert_eq!(statuses[0], StatusCode::UNAUTHORIZED);
    assert_eq!(statuses[1], StatusCode::UNAUTHORIZED);
    assert_eq!(statuses[2], StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_disabled_rate_limit_allows_bursts() {
    let app = app_with_rate_limit(RateLimitConfig::disabled());

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
