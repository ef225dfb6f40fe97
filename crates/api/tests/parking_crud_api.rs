//! CRUD smoke tests for lots, slots, vehicles, sessions, and payments.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, get, get_auth, post_json, post_json_auth, put_json_auth, rect,
    seed_lot, seed_slot, seed_user, slot_status,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_lot_and_slots_with_availability(pool: PgPool) {
    let admin = seed_user(&pool, "admin1", "admin").await;
    let token = auth_token(admin, "admin");
    let app = common::build_test_app(pool);

    let lot = post_json_auth(
        app.clone(),
        "/api/v1/parking-lots",
        &token,
        json!({ "name": "Central", "location": "1 Main St", "total_slots": 2, "price_per_hour": 25000 }),
    )
    .await;
    assert_eq!(lot.status(), StatusCode::CREATED);
    let lot_id = body_json(lot).await["id"].as_i64().expect("lot id");

    for code in ["A1", "A2"] {
        let slot = post_json_auth(
            app.clone(),
            "/api/v1/parking-slots",
            &token,
            json!({ "parking_lot_id": lot_id, "slot_code": code }),
        )
        .await;
        assert_eq!(slot.status(), StatusCode::CREATED);
    }

    let availability = get(
        app,
        &format!("/api/v1/parking-lots/{lot_id}/availability"),
    )
    .await;
    assert_eq!(availability.status(), StatusCode::OK);
    let body = body_json(availability).await;
    assert_eq!(body["data"]["counts"][0]["status"], "available");
    assert_eq!(body["data"]["counts"][0]["count"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_positive_rate_is_rejected_at_creation(pool: PgPool) {
    let admin = seed_user(&pool, "admin2", "admin").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/parking-lots",
        &auth_token(admin, "admin"),
        json!({ "name": "Free Lot", "location": "Nowhere", "price_per_hour": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slot_calibration_round_trips_coordinates(pool: PgPool) {
    let admin = seed_user(&pool, "admin3", "admin").await;
    let token = auth_token(admin, "admin");
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", None).await;
    let app = common::build_test_app(pool);

    let updated = put_json_auth(
        app.clone(),
        &format!("/api/v1/parking-slots/{slot}"),
        &token,
        json!({ "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 2.0], [0.0, 2.0], [0.0, 0.0]]] }),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);

    let fetched = get(app, &format!("/api/v1/parking-slots/{slot}")).await;
    let body = body_json(fetched).await;
    assert_eq!(body["coordinates"][0][1], json!([4.0, 0.0]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn customer_vehicle_ownership_is_enforced(pool: PgPool) {
    let owner = seed_user(&pool, "owner", "customer").await;
    let other = seed_user(&pool, "other", "customer").await;
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/v1/vehicles",
        &auth_token(owner, "customer"),
        json!({ "license_plate": "51A-456.78", "vehicle_type": "car" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let vehicle_id = body_json(created).await["id"].as_i64().expect("id");

    let denied = get_auth(
        app.clone(),
        &format!("/api/v1/vehicles/{vehicle_id}"),
        &auth_token(other, "customer"),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let allowed = get_auth(
        app,
        &format!("/api/v1/vehicles/{vehicle_id}"),
        &auth_token(owner, "customer"),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_plate_for_same_user_conflicts(pool: PgPool) {
    let owner = seed_user(&pool, "dupe", "customer").await;
    let token = auth_token(owner, "customer");
    let app = common::build_test_app(pool);

    let first = post_json_auth(
        app.clone(),
        "/api/v1/vehicles",
        &token,
        json!({ "license_plate": "51A-000.01" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        app,
        "/api/v1/vehicles",
        &token,
        json!({ "license_plate": "51A-000.01" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_cancelling_active_session_releases_the_slot(pool: PgPool) {
    let admin = seed_user(&pool, "admin4", "admin").await;
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;
    let app = common::build_test_app(pool.clone());

    let entry = post_json(
        app.clone(),
        "/api/v1/detections",
        json!({ "license_plate": "51A-777.99", "flag": 0, "parking_lot_id": lot }),
    )
    .await;
    assert_eq!(entry.status(), StatusCode::OK);
    let session_id = body_json(entry).await["parking_session"]["id"]
        .as_i64()
        .expect("session id");

    let cancelled = put_json_auth(
        app,
        &format!("/api/v1/parking-sessions/{session_id}"),
        &auth_token(admin, "admin"),
        json!({ "status": "cancelled" }),
    )
    .await;
    assert_eq!(cancelled.status(), StatusCode::OK);
    assert_eq!(body_json(cancelled).await["status"], "cancelled");
    assert_eq!(slot_status(&pool, slot).await, "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_defaults_to_the_session_fee(pool: PgPool) {
    let operator = seed_user(&pool, "op1", "operator").await;
    let lot = seed_lot(&pool, 30_000).await;
    seed_slot(&pool, lot, "A1", None).await;
    let app = common::build_test_app(pool.clone());

    let entry = post_json(
        app.clone(),
        "/api/v1/detections",
        json!({ "license_plate": "PAY-ME", "flag": 0, "parking_lot_id": lot }),
    )
    .await;
    assert_eq!(entry.status(), StatusCode::OK);
    let exit = post_json(
        app.clone(),
        "/api/v1/detections",
        json!({ "license_plate": "PAY-ME", "flag": 1 }),
    )
    .await;
    assert_eq!(exit.status(), StatusCode::OK);
    let session_id = body_json(exit).await["parking_session"]["id"]
        .as_i64()
        .expect("session id");

    let payment = post_json_auth(
        app,
        "/api/v1/payments",
        &auth_token(operator, "operator"),
        json!({ "parking_session_id": session_id, "payment_method": "cash" }),
    )
    .await;
    assert_eq!(payment.status(), StatusCode::CREATED);
    let body = body_json(payment).await;
    assert_eq!(body["amount"], 30_000);
    assert_eq!(body["status"], "pending");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_for_active_session_is_rejected(pool: PgPool) {
    let operator = seed_user(&pool, "op2", "operator").await;
    let lot = seed_lot(&pool, 30_000).await;
    seed_slot(&pool, lot, "A1", None).await;
    let app = common::build_test_app(pool.clone());

    let entry = post_json(
        app.clone(),
        "/api/v1/detections",
        json!({ "license_plate": "STILL-IN", "flag": 0, "parking_lot_id": lot }),
    )
    .await;
    let session_id = body_json(entry).await["parking_session"]["id"]
        .as_i64()
        .expect("session id");

    let payment = post_json_auth(
        app,
        "/api/v1/payments",
        &auth_token(operator, "operator"),
        json!({ "parking_session_id": session_id, "payment_method": "cash" }),
    )
    .await;
    assert_eq!(payment.status(), StatusCode::BAD_REQUEST);
}
