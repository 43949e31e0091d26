mod common;

use axum::http::StatusCode;
use campus_models::UserRole;
use common::{
    TestApp, create_test_course, create_test_student, create_test_user, empty_request,
    json_request,
};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn balance(pool: &PgPool, unique_id: &str) -> (f64, f64) {
    sqlx::query_as::<_, (f64, f64)>(
        "SELECT amount_paid, amount_due FROM students WHERE unique_id = $1",
    )
    .bind(unique_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn open_order(app: &TestApp, unique_id: &str, amount: f64) -> Value {
    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/fees/orders",
            None,
            json!({ "unique_id": unique_id, "amount": amount, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn verify(app: &TestApp, order_id: &str) -> (StatusCode, Value) {
    app.send(json_request(
        "POST",
        "/api/fees/orders/verify",
        None,
        json!({ "order_id": order_id }),
    ))
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_offline_payment_moves_balance(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;

    let (status, fee) = app
        .send(json_request(
            "PATCH",
            "/api/fees",
            Some(&admin.token),
            json!({ "unique_id": unique_id, "amount": 15000.0, "payment_type": "Semester Fee" }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{}", fee);
    assert_eq!(fee["status"], "Completed");
    assert_eq!(fee["payment_method"], "Cash");
    assert_eq!(fee["due_fee"], 25000.0);
    assert!(fee["payment_id"].as_str().unwrap().starts_with("OFFLINE_"));
    assert_eq!(balance(&pool, &unique_id).await, (15000.0, 25000.0));

    let (status, _) = app
        .send(json_request(
            "PATCH",
            "/api/fees",
            Some(&admin.token),
            json!({ "unique_id": unique_id, "amount": 25000.01, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(balance(&pool, &unique_id).await, (15000.0, 25000.0));

    let (status, history) = app
        .send(empty_request(
            "GET",
            &format!("/api/fees/history?unique_id={}", unique_id),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, bill) = app
        .send(empty_request(
            "GET",
            &format!("/api/fees/bill?payment_id={}", fee["payment_id"].as_str().unwrap()),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bill["student_id"], unique_id);
    assert_eq!(bill["amount_paid"], 15000.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payments_require_accepted_admission(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let pending = create_test_student(&pool, course_id, "pending", 40000.0).await;

    let (status, _) = app
        .send(json_request(
            "PATCH",
            "/api/fees",
            Some(&admin.token),
            json!({ "unique_id": pending, "amount": 100.0, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/fees/orders",
            None,
            json!({ "unique_id": pending, "amount": 100.0, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/fees/orders",
            None,
            json!({ "unique_id": "STU0000000000", "amount": 100.0, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_online_payment_settles_once(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;

    let order = open_order(&app, &unique_id, 10000.0).await;
    let order_id = order["order_id"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("ORDER_"));
    assert_eq!(order["payment_session_id"], format!("session_{}", order_id));
    assert_eq!(order["hash"].as_str().unwrap().len(), 64);
    assert_eq!(order["fee"]["status"], "Pending");
    assert_eq!(order["fee"]["payment_method"], "Online");
    assert_eq!(balance(&pool, &unique_id).await, (0.0, 40000.0));

    let (status, body) = verify(&app, &order_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gateway_status"], "ACTIVE");
    assert_eq!(body["fee_status"], "Pending");
    assert_eq!(body["applied"], false);

    app.gateway.set_status(&order_id, "PAID");

    let (status, body) = verify(&app, &order_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fee_status"], "Completed");
    assert_eq!(body["applied"], true);
    assert_eq!(body["fee"]["due_fee"], 30000.0);
    assert_eq!(balance(&pool, &unique_id).await, (10000.0, 30000.0));

    let (status, body) = verify(&app, &order_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], false);
    assert_eq!(balance(&pool, &unique_id).await, (10000.0, 30000.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_order_fails_without_touching_balance(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;

    let order = open_order(&app, &unique_id, 5000.0).await;
    let order_id = order["order_id"].as_str().unwrap();

    app.gateway.set_status(order_id, "EXPIRED");
    let (status, body) = verify(&app, order_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fee_status"], "Failed");
    assert_eq!(body["applied"], true);

    app.gateway.set_status(order_id, "PAID");
    let (_, body) = verify(&app, order_id).await;
    assert_eq!(body["fee_status"], "Failed");
    assert_eq!(body["applied"], false);
    assert_eq!(balance(&pool, &unique_id).await, (0.0, 40000.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_unknown_order(pool: PgPool) {
    let app = TestApp::new(pool);
    let (status, _) = verify(&app, "ORDER_doesnotexist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_earnings_and_stats(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;
    create_test_student(&pool, course_id, "pending", 40000.0).await;

    for amount in [1000.0, 2500.0] {
        let (status, _) = app
            .send(json_request(
                "PATCH",
                "/api/fees",
                Some(&admin.token),
                json!({ "unique_id": unique_id, "amount": amount, "payment_type": "Semester Fee" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    // A pending online order does not count as earnings.
    open_order(&app, &unique_id, 700.0).await;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let (status, report) = app
        .send(empty_request(
            "GET",
            &format!("/api/fees/earnings?start_date={}", today),
            Some(&admin.token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", report);
    assert_eq!(report["total_earnings"], 3500.0);
    assert_eq!(report["total_payments"], 2);

    let (status, _) = app
        .send(empty_request(
            "GET",
            "/api/fees/earnings?start_date=2025-02-10&end_date=2025-02-01",
            Some(&admin.token),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) = app
        .send(empty_request("GET", "/api/stats", Some(&admin.token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_courses"], 1);
    assert_eq!(stats["total_students"], 1);
    assert_eq!(stats["pending_admissions"], 1);
    assert_eq!(stats["total_earnings"], 3500.0);

    let (status, _) = app
        .send(empty_request(
            "DELETE",
            &format!("/api/admissions/{}", unique_id),
            Some(&admin.token),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(empty_request(
            "DELETE",
            &format!("/api/students/{}", unique_id),
            Some(&admin.token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fees")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_pending_orders_hold_their_amount(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let admin = create_test_user(&pool, UserRole::Admin).await;
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;

    let first = open_order(&app, &unique_id, 30000.0).await;
    let first_id = first["order_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/fees/orders",
            None,
            json!({ "unique_id": unique_id, "amount": 30000.0, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pending online payments"));

    let (status, _) = app
        .send(json_request(
            "PATCH",
            "/api/fees",
            Some(&admin.token),
            json!({ "unique_id": unique_id, "amount": 15000.0, "payment_type": "Semester Fee" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let second = open_order(&app, &unique_id, 10000.0).await;
    let second_id = second["order_id"].as_str().unwrap().to_string();

    app.gateway.set_status(&first_id, "PAID");
    app.gateway.set_status(&second_id, "PAID");
    let (_, first) = verify(&app, &first_id).await;
    let (_, second) = verify(&app, &second_id).await;
    assert_eq!(first["applied"], true);
    assert_eq!(second["applied"], true);
    assert_eq!(second["fee"]["due_fee"], 0.0);

    let (paid, due) = balance(&pool, &unique_id).await;
    assert_eq!((paid, due), (40000.0, 0.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_order_releases_its_amount(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;

    let order = open_order(&app, &unique_id, 30000.0).await;
    let order_id = order["order_id"].as_str().unwrap();
    app.gateway.set_status(order_id, "TERMINATED");
    let (_, body) = verify(&app, order_id).await;
    assert_eq!(body["fee_status"], "Failed");

    open_order(&app, &unique_id, 40000.0).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_settlement_larger_than_balance_is_refused(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let course_id = create_test_course(&pool, 40000.0, 6).await;
    let unique_id = create_test_student(&pool, course_id, "accepted", 40000.0).await;

    let order = open_order(&app, &unique_id, 30000.0).await;
    let order_id = order["order_id"].as_str().unwrap();

    // Balance moved outside the payment flow after the order was opened.
    sqlx::query("UPDATE students SET amount_paid = 30000, amount_due = 10000 WHERE unique_id = $1")
        .bind(&unique_id)
        .execute(&pool)
        .await
        .unwrap();

    app.gateway.set_status(order_id, "PAID");
    let (status, _) = verify(&app, order_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(balance(&pool, &unique_id).await, (30000.0, 10000.0));

    let (status, history) = app
        .send(empty_request(
            "GET",
            &format!("/api/fees/history?unique_id={}", unique_id),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["status"], "Pending");
}
