//! Integration tests for registration, login, token refresh, and RBAC.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, get_auth, post_json, post_json_auth, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn register_then_login_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);

    let register = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(register.status(), StatusCode::CREATED);
    let body = body_json(register).await;
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["access_token"].is_string());

    let login = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "alice@example.com", "password": "correct-horse-battery" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let login_body = body_json(login).await;

    let me = get_auth(
        app,
        "/api/v1/auth/me",
        login_body["access_token"].as_str().expect("token"),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["data"]["username"], "alice");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_is_unauthorized(pool: PgPool) {
    seed_user(&pool, "bob", "customer").await;
    let app = common::build_test_app(pool);

    let login = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "bob@example.com", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(login).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let register = post_json(
        app,
        "/api/v1/auth/register",
        json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "short",
        }),
    )
    .await;
    assert_eq!(register.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let register = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({
            "username": "dave",
            "email": "dave@example.com",
            "password": "a-long-enough-password",
        }),
    )
    .await;
    let refresh_token = body_json(register).await["refresh_token"]
        .as_str()
        .expect("refresh token")
        .to_string();

    let refresh = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::OK);

    // The presented token was revoked by the rotation.
    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/notifications").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn customer_cannot_create_parking_lot(pool: PgPool) {
    let customer = seed_user(&pool, "erin", "customer").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/parking-lots",
        &auth_token(customer, "customer"),
        json!({ "name": "Lot", "location": "Here", "price_per_hour": 1000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn operator_can_list_sessions_but_not_create_lots(pool: PgPool) {
    let operator = seed_user(&pool, "frank", "operator").await;
    let token = auth_token(operator, "operator");
    let app = common::build_test_app(pool);

    let sessions = get_auth(app.clone(), "/api/v1/parking-sessions", &token).await;
    assert_eq!(sessions.status(), StatusCode::OK);

    let create = post_json_auth(
        app,
        "/api/v1/parking-lots",
        &token,
        json!({ "name": "Lot", "location": "Here", "price_per_hour": 1000 }),
    )
    .await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);
}
