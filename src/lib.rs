//! Ride Auth - authentication backend for the campus ride platform.
//!
//! Registers users, verifies credentials at login, and issues signed,
//! time-limited bearer tokens. Verification is stateless: there is no
//! session store and no revocation list.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities (users, passwords)
//! - **services**: Registration/login flows and token handling
//! - **infra**: Infrastructure concerns (database, user store)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
