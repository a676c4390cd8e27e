mod common;

use axum::{Router, http::StatusCode, middleware, routing::get};
use axum_test::TestServer;
use common::TestCoupon;
use serde_json::{Value, json};
use sqlx::PgPool;
use storefront::api::handlers::{create_coupon_handler, get_coupon_handler, list_coupons_handler};
use storefront::api::middleware::auth;

fn server(pool: PgPool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route(
            "/api/admin/coupons",
            get(list_coupons_handler).post(create_coupon_handler),
        )
        .route("/api/admin/coupons/{code}", get(get_coupon_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .with_state(state);

    TestServer::new(app).unwrap()
}

fn new_coupon(code: &str) -> Value {
    json!({
        "code": code,
        "description": "Spring sale",
        "discountType": "percentage",
        "discountValue": 15,
        "validFrom": "2024-03-01T00:00:00Z",
        "validTo": "2099-03-31T23:59:59Z",
        "usageLimit": 100
    })
}

#[sqlx::test]
async fn test_admin_requires_token(pool: PgPool) {
    let server = server(pool);

    let response = server.get("/api/admin/coupons").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let json = response.json::<Value>();
    assert_eq!(json["code"], "unauthorized");
    assert_eq!(json["details"]["reason"], "missing_bearer");
}

#[sqlx::test]
async fn test_admin_rejects_unknown_token(pool: PgPool) {
    let server = server(pool);

    let response = server
        .get("/api/admin/coupons")
        .authorization_bearer("not-a-real-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["details"]["reason"],
        "unknown_or_revoked_token"
    );
}

#[sqlx::test]
async fn test_admin_rejects_revoked_token(pool: PgPool) {
    let token = common::create_admin_token(&pool, "revoked").await;
    sqlx::query("UPDATE api_tokens SET revoked_at = NOW() WHERE name = 'revoked'")
        .execute(&pool)
        .await
        .unwrap();
    let server = server(pool);

    let response = server
        .get("/api/admin/coupons")
        .authorization_bearer(token)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_create_and_fetch_coupon(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    let server = server(pool);

    let response = server
        .post("/api/admin/coupons")
        .authorization_bearer(&token)
        .json(&new_coupon("SPRING15"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    assert_eq!(created["code"], "SPRING15");
    assert_eq!(created["isActive"], true);
    assert_eq!(created["usageCount"], 0);
    assert_eq!(created["usageLimit"], 100);

    let response = server
        .get("/api/admin/coupons/SPRING15")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], created["id"]);
}

#[sqlx::test]
async fn test_create_duplicate_code_conflicts(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    TestCoupon::active("SAVE10").insert(&pool).await;
    let server = server(pool);

    let response = server
        .post("/api/admin/coupons")
        .authorization_bearer(&token)
        .json(&new_coupon("SAVE10"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[sqlx::test]
async fn test_create_rejects_invalid_input(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    let server = server(pool);

    server
        .post("/api/admin/coupons")
        .authorization_bearer(&token)
        .json(&new_coupon("no spaces allowed"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut too_much = new_coupon("HUGE");
    too_much["discountValue"] = json!(150);
    server
        .post("/api/admin/coupons")
        .authorization_bearer(&token)
        .json(&too_much)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut backwards = new_coupon("BACKWARDS");
    backwards["validTo"] = json!("2024-01-01T00:00:00Z");
    server
        .post("/api/admin/coupons")
        .authorization_bearer(&token)
        .json(&backwards)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_get_unknown_coupon(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    let server = server(pool);

    let response = server
        .get("/api/admin/coupons/MISSING")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_list_coupons_paginated(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    for code in ["FIRST", "SECOND", "THIRD"] {
        TestCoupon::active(code).insert(&pool).await;
    }
    let server = server(pool);

    let response = server
        .get("/api/admin/coupons")
        .add_query_param("page", "1")
        .add_query_param("page_size", "2")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["pageSize"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["code"], "THIRD");
}

#[sqlx::test]
async fn test_list_coupons_rejects_oversized_page(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    let server = server(pool);

    let response = server
        .get("/api/admin/coupons")
        .add_query_param("page_size", "1000")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["details"]["field"], "page_size");

    let response = server
        .get("/api/admin/coupons")
        .add_query_param("page", "0")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["details"]["field"], "page");
}

#[sqlx::test]
async fn test_successful_auth_records_last_use(pool: PgPool) {
    let token = common::create_admin_token(&pool, "backoffice").await;
    let server = server(pool.clone());

    server
        .get("/api/admin/coupons")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let last_used: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM api_tokens WHERE name = 'backoffice'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_used.is_some());
}
