//! Shared test harness: router construction mirroring `main.rs`, plus
//! request and seeding helpers.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use parkview_api::auth::jwt::{issue_access_token, JwtConfig};
use parkview_api::auth::password::hash_password;
use parkview_api::config::{DetectorConfig, ParkingConfig, ServerConfig};
use parkview_api::routes;
use parkview_api::state::AppState;
use parkview_core::geometry::{GeoEngine, Polygon};
use parkview_core::types::DbId;
use parkview_db::models::parking_lot::CreateParkingLot;
use parkview_db::models::parking_slot::CreateParkingSlot;
use parkview_db::models::user::CreateUser;
use parkview_db::repositories::{
    ParkingLotRepo, ParkingSlotRepo, RoleRepo, UserRepo, VehicleRepo,
};
use parkview_detector::DetectorApi;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT
/// secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "parkview-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        detector: DetectorConfig {
            // Unroutable port: tests never reach a real detector.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        },
        parking: ParkingConfig {
            fee_increase_percent: 10,
            minimum_billed_hours: 1,
            occupancy_threshold: 0.5,
        },
        upload_dir: std::env::temp_dir()
            .join("parkview-test-uploads")
            .to_string_lossy()
            .into_owned(),
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        detector: Arc::new(
            DetectorApi::new(config.detector.base_url.clone(), config.detector.timeout())
                .expect("detector client"),
        ),
        geometry: Arc::new(GeoEngine),
        http: reqwest::Client::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a test access token for a user id and role name.
pub fn auth_token(user_id: DbId, role: &str) -> String {
    issue_access_token(user_id, role, &test_config().jwt).expect("token issuance")
}

/// GET a path with no auth.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// GET a path with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// POST a JSON body with no auth.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// POST a JSON body with a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// PUT a JSON body with a Bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be valid JSON")
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Create a user with the given role (role names come from the seed
/// migration). Returns the user id.
pub async fn seed_user(pool: &PgPool, username: &str, role_name: &str) -> DbId {
    let role = RoleRepo::find_by_name(pool, role_name)
        .await
        .expect("role query")
        .expect("seeded role");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password("password-123").expect("hash"),
            full_name: None,
            phone: None,
            role_id: role.id,
        },
    )
    .await
    .expect("user insert");
    user.id
}

/// Create a parking lot with the given hourly rate. Returns the lot id.
pub async fn seed_lot(pool: &PgPool, rate: i64) -> DbId {
    let lot = ParkingLotRepo::create(
        pool,
        &CreateParkingLot {
            name: "Lot".to_string(),
            location: "Downtown".to_string(),
            total_slots: Some(10),
            price_per_hour: rate,
        },
    )
    .await
    .expect("lot insert");
    lot.id
}

/// Create a slot in a lot, optionally with a footprint polygon.
pub async fn seed_slot(
    pool: &PgPool,
    lot_id: DbId,
    code: &str,
    coordinates: Option<Polygon>,
) -> DbId {
    let slot = ParkingSlotRepo::create(
        pool,
        &CreateParkingSlot {
            parking_lot_id: lot_id,
            slot_code: code.to_string(),
            status: None,
            coordinates,
        },
    )
    .await
    .expect("slot insert");
    slot.id
}

/// Register a vehicle for a user. Returns the vehicle id.
pub async fn seed_vehicle(pool: &PgPool, user_id: DbId, plate: &str) -> DbId {
    let vehicle = VehicleRepo::create(pool, user_id, plate, "car")
        .await
        .expect("vehicle insert");
    vehicle.id
}

/// Axis-aligned rectangle polygon (closed exterior ring).
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::from_exterior(vec![
        [x0, y0],
        [x1, y0],
        [x1, y1],
        [x0, y1],
        [x0, y0],
    ])
}

/// Current status string of a slot.
pub async fn slot_status(pool: &PgPool, slot_id: DbId) -> String {
    ParkingSlotRepo::find_by_id(pool, slot_id)
        .await
        .expect("slot query")
        .expect("slot exists")
        .status
}
