//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;

pub use auth_service::{
    decode_token, issue_token, AuthService, Authenticator, Claims, LoginOutcome, Registration,
    TokenResponse,
};
