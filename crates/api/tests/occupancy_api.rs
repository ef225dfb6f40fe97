//! Integration tests for camera-driven occupancy reconciliation behind
//! `POST /api/v1/detections/occupancy`.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, rect, seed_lot, seed_slot, slot_status};
use serde_json::json;
use sqlx::PgPool;

fn occupancy_body(lot_id: i64, vehicles: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "parking_lot_id": lot_id, "vehicles": vehicles })
}

/// A vehicle polygon as the wire format expects it: a list of rings.
fn vehicle(x0: f64, y0: f64, x1: f64, y1: f64) -> serde_json::Value {
    json!([[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])
}

#[sqlx::test(migrations = "../db/migrations")]
async fn majority_overlap_flips_slot_to_occupied(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(lot, vec![vehicle(0.0, 0.0, 0.9, 1.0)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["occupied"], 1);
    assert_eq!(slot_status(&pool, slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn exactly_half_overlap_does_not_flip(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;

    let app = common::build_test_app(pool.clone());
    // Intersection is exactly 50% of the slot area; the threshold is
    // strictly greater-than.
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(lot, vec![vehicle(0.0, 0.0, 0.5, 1.0)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(slot_status(&pool, slot).await, "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn just_over_half_overlap_flips(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(lot, vec![vehicle(0.0, 0.0, 0.500001, 1.0)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(slot_status(&pool, slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn vacated_slot_without_session_is_released(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;
    sqlx::query("UPDATE parking_slots SET status = 'occupied' WHERE id = $1")
        .bind(slot)
        .execute(&pool)
        .await
        .expect("status update");

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(lot, vec![]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["released"], 1);
    assert_eq!(slot_status(&pool, slot).await, "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slot_with_active_session_is_never_released(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;

    // Open a real session on the slot through the webhook.
    let app = common::build_test_app(pool.clone());
    let entry = post_json(
        app.clone(),
        "/api/v1/detections",
        json!({ "license_plate": "51A-314.15", "flag": 0, "parking_lot_id": lot }),
    )
    .await;
    assert_eq!(entry.status(), StatusCode::OK);
    assert_eq!(slot_status(&pool, slot).await, "occupied");

    // No vehicle overlaps the slot in this pass; the active session
    // must still pin it occupied.
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(lot, vec![]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["released"], 0);
    assert_eq!(slot_status(&pool, slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slot_without_coordinates_is_skipped(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let blind_slot = seed_slot(&pool, lot, "A1", None).await;
    let mapped_slot = seed_slot(&pool, lot, "A2", Some(rect(2.0, 0.0, 3.0, 1.0))).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(lot, vec![vehicle(2.0, 0.0, 3.0, 1.0)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["skipped"][0], blind_slot);
    assert_eq!(slot_status(&pool, blind_slot).await, "available");
    assert_eq!(slot_status(&pool, mapped_slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn degenerate_vehicle_polygon_does_not_abort_the_pass(pool: PgPool) {
    let lot = seed_lot(&pool, 30_000).await;
    let slot = seed_slot(&pool, lot, "A1", Some(rect(0.0, 0.0, 1.0, 1.0))).await;

    let app = common::build_test_app(pool.clone());
    // First vehicle is a two-point degenerate ring, second fully
    // covers the slot.
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(
            lot,
            vec![json!([[[0.0, 0.0], [1.0, 1.0]]]), vehicle(0.0, 0.0, 1.0, 1.0)],
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(slot_status(&pool, slot).await, "occupied");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_lot_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/detections/occupancy",
        occupancy_body(999, vec![]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
