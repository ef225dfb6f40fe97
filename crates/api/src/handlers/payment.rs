//! Handlers for the `/payments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::status::{payment_method, payment_status, SessionStatus};
use parkview_core::types::DbId;
use parkview_db::models::payment::{CreatePayment, Payment, UpdatePayment};
use parkview_db::repositories::{ParkingSessionRepo, PaymentRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// POST /api/v1/payments
///
/// Record a payment against a completed session. When `amount` is
/// omitted the session's computed fee is charged.
pub async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    if !payment_method::ALL.contains(&input.payment_method.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown payment method: {}",
            input.payment_method
        ))));
    }

    let session = ParkingSessionRepo::find_by_id(&state.pool, input.parking_session_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSession",
            id: input.parking_session_id,
        })?;
    if session.status != SessionStatus::Completed.as_str() {
        return Err(AppError::Core(CoreError::Validation(
            "Payments can only be recorded for completed sessions".into(),
        )));
    }

    let amount = match input.amount.or(session.fee) {
        Some(amount) if amount > 0 => amount,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Payment amount must be positive".into(),
            )))
        }
    };

    let payment =
        PaymentRepo::create(&state.pool, session.id, amount, &input.payment_method).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /api/v1/payments/{id}
pub async fn get_by_id(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Payment>> {
    let payment = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Payment",
            id,
        })?;
    Ok(Json(payment))
}

/// GET /api/v1/parking-sessions/{id}/payments
pub async fn list_by_session(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<Vec<Payment>>> {
    ParkingSessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSession",
            id: session_id,
        })?;

    let payments = PaymentRepo::list_by_session(&state.pool, session_id).await?;
    Ok(Json(payments))
}

/// PUT /api/v1/payments/{id}
///
/// Settle or fail a pending payment.
pub async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePayment>,
) -> AppResult<Json<Payment>> {
    if !payment_status::ALL.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown payment status: {}",
            input.status
        ))));
    }

    let payment = PaymentRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Payment",
            id,
        })?;
    Ok(Json(payment))
}
