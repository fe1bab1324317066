//! API boundary tests.
//!
//! Exercise the request types, their validation rules, and the error
//! response contract without requiring a database connection.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use ride_auth::api::handlers::auth_handler::{LoginRequest, RegisterRequest};
use ride_auth::errors::AppError;

// =============================================================================
// Request Validation
// =============================================================================

fn valid_register_request() -> RegisterRequest {
    serde_json::from_str(
        r#"{
            "name": "A",
            "email": "a@x.com",
            "phone": "555",
            "password": "pw123456",
            "confirmPassword": "pw123456",
            "role": "student"
        }"#,
    )
    .unwrap()
}

#[test]
fn register_request_parses_wire_field_names() {
    // confirmPassword arrives camelCased from clients
    let req = valid_register_request();
    assert_eq!(req.confirm_password, "pw123456");
    assert!(req.validate().is_ok());
}

#[test]
fn register_request_requires_matching_passwords() {
    let mut req = valid_register_request();
    req.confirm_password = "pw1234567".to_string();

    let err = req.validate().unwrap_err();
    let messages = format!("{:?}", err);
    assert!(messages.contains("Passwords do not match"));
}

#[test]
fn register_request_enforces_password_length() {
    let mut req = valid_register_request();
    req.password = "short".to_string();
    req.confirm_password = "short".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn register_request_rejects_bad_email() {
    let mut req = valid_register_request();
    req.email = "not-an-email".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn register_request_rejects_blank_fields() {
    let mut req = valid_register_request();
    req.name = String::new();
    assert!(req.validate().is_err());

    let mut req = valid_register_request();
    req.phone = String::new();
    assert!(req.validate().is_err());
}

#[test]
fn register_request_role_is_optional_at_the_boundary() {
    // Role presence is a flow decision, not a parse error
    let req: RegisterRequest = serde_json::from_str(
        r#"{
            "name": "A",
            "email": "a@x.com",
            "phone": "555",
            "password": "pw123456",
            "confirmPassword": "pw123456"
        }"#,
    )
    .unwrap();
    assert!(req.role.is_none());
    assert!(req.validate().is_ok());
}

#[test]
fn login_request_parses_and_validates() {
    let req: LoginRequest = serde_json::from_str(
        r#"{"email": "a@x.com", "password": "pw123456", "role": "student"}"#,
    )
    .unwrap();
    assert!(req.validate().is_ok());

    let req: LoginRequest =
        serde_json::from_str(r#"{"email": "a@x.com", "password": ""}"#).unwrap();
    assert!(req.validate().is_err());
}

// =============================================================================
// Error Response Contract
// =============================================================================

async fn response_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn validation_errors_render_as_detail_with_400() {
    let (status, body) = response_body(AppError::validation("All fields are required")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "All fields are required");
}

#[tokio::test]
async fn conflict_renders_as_detail_with_400() {
    let (status, body) = response_body(AppError::conflict("Email")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already exists");
}

#[tokio::test]
async fn invalid_credentials_render_as_detail_with_400() {
    let (status, body) = response_body(AppError::InvalidCredentials).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid email or password");
}

#[tokio::test]
async fn internal_errors_hide_their_cause() {
    let (status, body) = response_body(AppError::internal("pool timeout at 10.0.0.3")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "An internal error occurred");
}

#[tokio::test]
async fn unauthorized_renders_401() {
    let (status, _) = response_body(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
