//! Handlers for the `/vehicles` resource.
//!
//! Customers manage their own vehicles; staff can list everything.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::roles::{ROLE_ADMIN, ROLE_OPERATOR};
use parkview_core::status::vehicle_type;
use parkview_core::types::DbId;
use parkview_db::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle};
use parkview_db::repositories::VehicleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/vehicles
///
/// Register a vehicle for the authenticated user.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    let kind = input.vehicle_type.as_deref().unwrap_or(vehicle_type::CAR);
    validate_vehicle_type(kind)?;
    if input.license_plate.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "License plate must not be empty".into(),
        )));
    }

    let vehicle =
        VehicleRepo::create(&state.pool, auth.user_id, input.license_plate.trim(), kind).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// GET /api/v1/vehicles
///
/// Staff see every vehicle; customers only their own.
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = if is_staff(&auth) {
        VehicleRepo::list(&state.pool).await?
    } else {
        VehicleRepo::list_by_user(&state.pool, auth.user_id).await?
    };
    Ok(Json(vehicles))
}

/// GET /api/v1/vehicles/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = fetch_owned(&auth, &state, id).await?;
    Ok(Json(vehicle))
}

/// PUT /api/v1/vehicles/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVehicle>,
) -> AppResult<Json<Vehicle>> {
    if let Some(kind) = input.vehicle_type.as_deref() {
        validate_vehicle_type(kind)?;
    }
    fetch_owned(&auth, &state, id).await?;

    let vehicle = VehicleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Vehicle",
            id,
        })?;
    Ok(Json(vehicle))
}

/// DELETE /api/v1/vehicles/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    fetch_owned(&auth, &state, id).await?;
    VehicleRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load a vehicle, rejecting customers that do not own it.
async fn fetch_owned(auth: &AuthUser, state: &AppState, id: DbId) -> AppResult<Vehicle> {
    let vehicle = VehicleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Vehicle",
            id,
        })?;
    if !is_staff(auth) && vehicle.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not allowed to access another user's vehicle".into(),
        )));
    }
    Ok(vehicle)
}

fn is_staff(auth: &AuthUser) -> bool {
    auth.role == ROLE_ADMIN || auth.role == ROLE_OPERATOR
}

fn validate_vehicle_type(kind: &str) -> Result<(), AppError> {
    if !vehicle_type::ALL.contains(&kind) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown vehicle type: {kind}"
        ))));
    }
    Ok(())
}
