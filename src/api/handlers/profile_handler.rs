//! Authenticated profile handler.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserProfile;
use crate::errors::{AppError, AppResult};

/// Create profile routes (bearer token required)
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Get the caller's public profile
#[utoipa::path(
    get,
    path = "/me",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile", body = UserProfile),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .users
        .find_by_id(current_user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UserProfile::from(user)))
}
