//! Registration and login handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserProfile;
use crate::errors::AppResult;
use crate::services::Registration;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User display name
    #[validate(length(min = 1, message = "All fields are required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User phone number
    #[validate(length(min = 1, message = "All fields are required"))]
    #[schema(example = "555-0100")]
    pub phone: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "pw123456", min_length = 8)]
    pub password: String,
    /// Must repeat `password` exactly
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[schema(example = "pw123456")]
    pub confirm_password: String,
    /// Account role, "student" or "driver"; honored only when client-chosen
    /// roles are enabled
    #[schema(example = "student")]
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "All fields are required"))]
    #[schema(example = "pw123456")]
    pub password: String,
    /// Expected role; when present it must match the stored one
    #[schema(example = "student")]
    pub role: Option<String>,
}

/// Registration confirmation
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// User-facing confirmation
    #[schema(example = "Account created successfully!")]
    pub message: String,
    /// Suggested next step for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "/login")]
    pub redirect: Option<String>,
}

/// Successful login payload
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful!")]
    pub message: String,
    /// Compact signed bearer token
    pub token: String,
    /// Role of the authenticated user
    #[schema(example = "student")]
    pub role: String,
    /// Public profile of the authenticated user
    pub user: UserProfile,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failure or duplicate email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    state
        .auth_service
        .register(Registration {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
            role: payload.role,
        })
        .await?;

    Ok(Json(RegisterResponse {
        message: "Account created successfully!".to_string(),
        redirect: Some("/login".to_string()),
    }))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation failure or invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .auth_service
        .login(payload.email, payload.password, payload.role)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        token: outcome.token.access_token,
        role: outcome.user.role.to_string(),
        user: UserProfile::from(outcome.user),
    }))
}
