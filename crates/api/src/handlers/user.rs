//! Handlers for the `/users` resource.
//!
//! Listing and deactivation are admin-only; profile reads/updates are
//! allowed for the account owner as well.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::roles::ROLE_ADMIN;
use parkview_core::types::DbId;
use parkview_db::models::user::{UpdateUser, User};
use parkview_db::repositories::{RefreshTokenRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<User>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/v1/users/{id}
///
/// Admins can read any profile; other users only their own.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    ensure_self_or_admin(&auth, id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(user))
}

/// PUT /api/v1/users/{id}
///
/// Role changes are restricted to admins; other profile fields may be
/// edited by the account owner.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    ensure_self_or_admin(&auth, id)?;
    if input.role_id.is_some() && auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins may change roles".into(),
        )));
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(user))
}

/// POST /api/v1/users/{id}/deactivate
///
/// Deactivate an account and revoke all of its refresh tokens.
pub async fn deactivate(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = UserRepo::deactivate(&state.pool, id).await?;
    if !found {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }
    RefreshTokenRepo::revoke_all_for_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reject unless the caller is the target user or an admin.
fn ensure_self_or_admin(auth: &AuthUser, target: DbId) -> Result<(), AppError> {
    if auth.user_id != target && auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not allowed to access another user's profile".into(),
        )));
    }
    Ok(())
}
