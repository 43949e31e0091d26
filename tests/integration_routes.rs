//! Requests that are answered before any query runs: authentication,
//! payload validation and the documentation endpoints.

mod common;

use axum::http::{StatusCode, header};
use campus_models::UserRole;
use common::{TestApp, admission_body, empty_request, json_request, lazy_pool, token_for};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> TestApp {
    TestApp::new(lazy_pool())
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = app();
    let cases = [
        ("GET", "/api/stats"),
        ("GET", "/api/students"),
        ("GET", "/api/students/STU2025000001"),
        ("GET", "/api/admissions"),
        ("GET", "/api/admissions/STU2025000001"),
        ("DELETE", "/api/admissions/STU2025000001"),
        ("GET", "/api/fees/earnings?start_date=2025-01-01"),
        ("DELETE", "/api/courses/00000000-0000-0000-0000-000000000001"),
        ("DELETE", "/api/teachers/00000000-0000-0000-0000-000000000001"),
        ("DELETE", "/api/albums/00000000-0000-0000-0000-000000000001"),
        ("DELETE", "/api/images/00000000-0000-0000-0000-000000000001"),
        ("DELETE", "/api/testimonials/00000000-0000-0000-0000-000000000001"),
        ("GET", "/api/auth/me"),
    ];

    for (method, uri) in cases {
        let (status, body) = app.send(empty_request(method, uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "Authentication required", "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_admin_json_routes_check_token_before_body() {
    let app = app();

    let (status, _) = app
        .send(json_request("POST", "/api/courses", None, json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request(
            "PATCH",
            "/api/fees",
            None,
            json!({ "unique_id": "STU1", "amount": 100.0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/images/bulk-delete",
            None,
            json!({ "image_ids": [Uuid::new_v4()] }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = app();
    let forged = campus::campus_auth::create_access_token(
        Uuid::new_v4(),
        "admin@test.com",
        "admin",
        &campus::campus_config::JwtConfig {
            secret: "not_the_server_secret".to_string(),
            access_token_expiry: 3600,
            cookie_secure: false,
        },
    )
    .unwrap();

    let (status, body) = app
        .send(empty_request("GET", "/api/stats", Some(&forged)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_garbage_cookie_is_rejected() {
    let app = app();
    let request = axum::http::Request::builder()
        .uri("/api/students")
        .header(header::COOKIE, "token=not-a-jwt")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let (status, body) = app()
        .send(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Asha",
                "email": "asha@test.com",
                "password": "password123",
                "confirm_password": "password124"
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Passwords do not match"));
}

#[tokio::test]
async fn test_register_short_password() {
    let (status, _) = app()
        .send(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Asha",
                "email": "asha@test.com",
                "password": "short",
                "confirm_password": "short"
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_invalid_email_format() {
    let (status, _) = app()
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "not-an-email", "password": "password123" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_missing_password_field() {
    let (status, body) = app()
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "asha@test.com" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password is required");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = app();
    let response = app
        .router()
        .oneshot(empty_request("POST", "/api/auth/logout", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_logout_expires_existing_cookie() {
    let app = app();
    let mut request = empty_request("POST", "/api/auth/logout", None);
    request
        .headers_mut()
        .insert(header::COOKIE, "token=abc".parse().unwrap());

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("token=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_admission_validation() {
    let app = app();
    let course_id = Uuid::new_v4();

    let mut body = admission_body(course_id, "karan@test.com");
    body["phone"] = json!("12ab");
    let (status, _) = app
        .send(json_request("POST", "/api/admissions", None, body))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = admission_body(course_id, "karan@test.com");
    body["gender"] = json!("unknown");
    let (status, _) = app
        .send(json_request("POST", "/api/admissions", None, body))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = admission_body(course_id, "karan@test.com");
    body["date_of_birth"] = json!("17/05/2004");
    let (status, _) = app
        .send(json_request("POST", "/api/admissions", None, body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admission_malformed_json() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/admissions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{ not json"))
        .unwrap();

    let (status, _) = app().send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_requires_positive_amount() {
    let (status, _) = app()
        .send(json_request(
            "POST",
            "/api/fees/orders",
            None,
            json!({ "unique_id": "STU2025000001", "amount": 0.0, "payment_type": "Semester" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_verify_requires_order_id() {
    let (status, _) = app()
        .send(json_request(
            "POST",
            "/api/fees/orders/verify",
            None,
            json!({ "order_id": "" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let token = token_for(Uuid::new_v4(), "admin@test.com", UserRole::Admin);
    let (status, _) = app()
        .send(empty_request("GET", "/api/branches", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = app()
        .send(empty_request("GET", "/api-docs/openapi.json", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Campus API");
    assert!(body["paths"]["/api/fees/orders/verify"].is_object());
    assert!(body["paths"]["/api/admissions/{unique_id}/status"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app();

    let mut request = empty_request("GET", "/api/stats", None);
    request
        .headers_mut()
        .insert("x-request-id", "trace-abc-123".parse().unwrap());
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-abc-123");

    let response = app
        .router()
        .oneshot(empty_request("GET", "/api/stats", None))
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(Uuid::parse_str(generated).is_ok());
}
