//! Integration tests for the vehicle entry/exit state machine behind
//! `POST /api/v1/detections`.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, seed_lot, seed_slot, seed_user, seed_vehicle, slot_status};
use parkview_db::repositories::{NotificationRepo, ParkingSessionRepo};
use serde_json::json;
use sqlx::PgPool;

/// Webhook body for an entry detection.
fn entry_body(plate: &str, lot_id: i64) -> serde_json::Value {
    json!({ "license_plate": plate, "flag": 0, "parking_lot_id": lot_id })
}

/// Webhook body for an exit detection.
fn exit_body(plate: &str) -> serde_json::Value {
    json!({ "license_plate": plate, "flag": 1 })
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn entry_creates_session_and_occupies_slot(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot_a = seed_slot(&pool, lot, "A1", None).await;
    let slot_b = seed_slot(&pool, lot, "A2", None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/detections", entry_body("51A-111.11", lot)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_registered"], false);
    assert_eq!(json["parking_session"]["status"], "active");
    assert_eq!(json["parking_session"]["vehicle_id"], serde_json::Value::Null);
    // Lowest slot id wins the deterministic tie-break.
    assert_eq!(json["slot"]["id"], slot_a);

    assert_eq!(slot_status(&pool, slot_a).await, "occupied");
    assert_eq!(slot_status(&pool, slot_b).await, "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_entry_for_same_plate_conflicts(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    seed_slot(&pool, lot, "A1", None).await;
    seed_slot(&pool, lot, "A2", None).await;

    let app = common::build_test_app(pool.clone());
    let first = post_json(app.clone(), "/api/v1/detections", entry_body("51A-222.22", lot)).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_session = body_json(first).await["parking_session"]["id"]
        .as_i64()
        .expect("session id");

    let second = post_json(app, "/api/v1/detections", entry_body("51A-222.22", lot)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "DUPLICATE_ACTIVE_SESSION");
    assert_eq!(json["details"]["existing_session_id"], first_session);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn entry_without_lot_id_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/detections",
        json!({ "license_plate": "51A-333.33", "flag": 0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "MISSING_PARKING_LOT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_flag_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/detections",
        json!({ "license_plate": "51A-444.44", "flag": 2, "parking_lot_id": 1 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_FLAG");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn full_lot_yields_no_slot_available(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", None).await;

    let app = common::build_test_app(pool.clone());
    let first = post_json(app.clone(), "/api/v1/detections", entry_body("51A-555.55", lot)).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/detections", entry_body("51A-666.66", lot)).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(second).await["code"], "NO_SLOT_AVAILABLE");

    assert_eq!(slot_status(&pool, slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn suggested_slot_in_wrong_lot_is_rejected(pool: PgPool) {
    let lot_a = seed_lot(&pool, 30_000).await;
    let lot_b = seed_lot(&pool, 30_000).await;
    seed_slot(&pool, lot_a, "A1", None).await;
    let foreign_slot = seed_slot(&pool, lot_b, "B1", None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/detections",
        json!({
            "license_plate": "51A-777.77",
            "flag": 0,
            "parking_lot_id": lot_a,
            "slot_id": foreign_slot,
        }),
    )
    .await;

    // Never silently allocate a different slot.
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SLOT_UNAVAILABLE");
    assert_eq!(json["details"]["reason"], "wrong_lot");
    assert_eq!(slot_status(&pool, foreign_slot).await, "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn suggested_occupied_slot_is_rejected(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", None).await;
    seed_slot(&pool, lot, "A2", None).await;

    let app = common::build_test_app(pool.clone());
    let first = post_json(
        app.clone(),
        "/api/v1/detections",
        json!({
            "license_plate": "51A-888.88",
            "flag": 0,
            "parking_lot_id": lot,
            "slot_id": slot,
        }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(
        app,
        "/api/v1/detections",
        json!({
            "license_plate": "51A-999.99",
            "flag": 0,
            "parking_lot_id": lot,
            "slot_id": slot,
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "SLOT_UNAVAILABLE");
    assert_eq!(json["details"]["reason"], "not_available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn registered_entry_stores_notification(pool: PgPool) {
    let user = seed_user(&pool, "driver1", "customer").await;
    seed_vehicle(&pool, user, "51A-121.21").await;
    let lot = seed_lot(&pool, 30_000).await;
    seed_slot(&pool, lot, "A1", None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/detections", entry_body("51A-121.21", lot)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_registered"], true);
    assert_eq!(json["notification_sent"], true);

    let unread = NotificationRepo::unread_count(&pool, user).await.expect("count");
    assert_eq!(unread, 1);
}

// ---------------------------------------------------------------------------
// Exit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn exit_completes_session_and_releases_slot(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", None).await;
    let other = seed_slot(&pool, lot, "A2", None).await;

    let app = common::build_test_app(pool.clone());
    let entry = post_json(app.clone(), "/api/v1/detections", entry_body("51A-123.45", lot)).await;
    assert_eq!(entry.status(), StatusCode::OK);
    assert_eq!(slot_status(&pool, slot).await, "occupied");

    let exit = post_json(app, "/api/v1/detections", exit_body("51A-123.45")).await;
    assert_eq!(exit.status(), StatusCode::OK);
    let json = body_json(exit).await;

    // Sub-hour stay bills the 1-hour minimum at the lot rate.
    assert_eq!(json["parking_session"]["status"], "completed");
    assert_eq!(json["fee_details"]["duration_hours"], 1);
    assert_eq!(json["fee_details"]["total_fee"], 30_000);
    assert_eq!(json["fee_details"]["breakdown"][0]["fee"], 30_000);
    assert_eq!(json["parking_session"]["fee"], 30_000);

    // The session's slot is vacated; the untouched slot stays as-is.
    assert_eq!(slot_status(&pool, slot).await, "available");
    assert_eq!(slot_status(&pool, other).await, "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn exit_without_active_session_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/detections", exit_body("51A-000.00")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NO_ACTIVE_SESSION");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn exit_with_non_positive_rate_fails_without_completing(pool: PgPool) {
    // The create handler rejects non-positive rates, so force one in
    // directly to simulate legacy/corrupt data.
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", None).await;

    let app = common::build_test_app(pool.clone());
    let entry = post_json(app.clone(), "/api/v1/detections", entry_body("51A-242.42", lot)).await;
    assert_eq!(entry.status(), StatusCode::OK);

    sqlx::query("UPDATE parking_lots SET price_per_hour = 0 WHERE id = $1")
        .bind(lot)
        .execute(&pool)
        .await
        .expect("rate update");

    let exit = post_json(app, "/api/v1/detections", exit_body("51A-242.42")).await;
    assert_eq!(exit.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(exit).await["code"], "INVALID_RATE");

    // Nothing was mutated: session still active, slot still occupied.
    let session = ParkingSessionRepo::find_active_by_plate(&pool, "51A-242.42")
        .await
        .expect("query");
    assert!(session.is_some(), "session must remain active");
    assert_eq!(slot_status(&pool, slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn walk_up_round_trip_keeps_vehicle_tables_clean(pool: PgPool) {
    let lot = seed_lot(&pool, 20_000).await;
    seed_slot(&pool, lot, "A1", None).await;

    let app = common::build_test_app(pool.clone());
    let entry = post_json(app.clone(), "/api/v1/detections", entry_body("WALKUP-1", lot)).await;
    assert_eq!(entry.status(), StatusCode::OK);

    let exit = post_json(app, "/api/v1/detections", exit_body("WALKUP-1")).await;
    assert_eq!(exit.status(), StatusCode::OK);
    let json = body_json(exit).await;
    assert_eq!(json["is_registered"], false);
    assert_eq!(json["notification_sent"], false);

    // No placeholder vehicle or user rows were fabricated.
    let vehicles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(vehicles, 0);
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(users, 0);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_entries_for_one_slot_admit_exactly_one(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", None).await;

    let app = common::build_test_app(pool.clone());
    let requests = ["CAR-1", "CAR-2", "CAR-3", "CAR-4"].map(|plate| {
        let app = app.clone();
        let body = entry_body(plate, lot);
        tokio::spawn(async move { post_json(app, "/api/v1/detections", body).await.status() })
    });

    let mut successes = 0;
    for handle in requests {
        let status = handle.await.expect("task");
        if status == StatusCode::OK {
            successes += 1;
        } else {
            assert!(
                status == StatusCode::NOT_FOUND || status == StatusCode::CONFLICT,
                "losers must fail with a named allocation error, got {status}"
            );
        }
    }

    assert_eq!(successes, 1, "exactly one entry may win the single slot");

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM parking_sessions WHERE parking_slot_id = $1 AND status = 'active'",
    )
    .bind(slot)
    .fetch_one(&pool)
    .await
    .expect("count");
    assert_eq!(active, 1, "never two sessions on the same slot");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_entries_for_same_plate_open_one_session(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    for code in ["A1", "A2", "A3", "A4"] {
        seed_slot(&pool, lot, code, None).await;
    }

    let app = common::build_test_app(pool.clone());
    let requests: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            let body = entry_body("SAME-PLATE", lot);
            tokio::spawn(async move { post_json(app, "/api/v1/detections", body).await.status() })
        })
        .collect();

    let mut successes = 0;
    for handle in requests {
        if handle.await.expect("task") == StatusCode::OK {
            successes += 1;
        }
    }
    assert_eq!(successes, 1, "one identity, one active session");

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM parking_sessions WHERE license_plate = 'SAME-PLATE' AND status = 'active'",
    )
    .fetch_one(&pool)
    .await
    .expect("count");
    assert_eq!(active, 1);

    let occupied: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM parking_slots WHERE parking_lot_id = $1 AND status = 'occupied'",
    )
    .bind(lot)
    .fetch_one(&pool)
    .await
    .expect("count");
    assert_eq!(occupied, 1, "losing entries must roll their slot back");
}
