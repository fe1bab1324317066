//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default bearer token lifetime in hours (one day)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// User Roles
// =============================================================================

/// Role for riders booking a seat
pub const ROLE_STUDENT: &str = "student";

/// Role for drivers offering rides
pub const ROLE_DRIVER: &str = "driver";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_DRIVER];

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: u64 = 1;
