//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_TTL_HOURS, MIN_JWT_SECRET_LENGTH,
    ROLE_STUDENT, VALID_ROLES,
};

/// Application configuration.
///
/// Loaded once at startup and shared read-only for the lifetime of the
/// process. The signing secret is never rotated at runtime.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub(crate) jwt_secret: String,
    pub token_ttl_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// When true, registration accepts a caller-supplied role (validated
    /// against the closed set). When false, `default_role` is assigned and
    /// any caller-supplied role is ignored.
    pub allow_client_role: bool,
    pub default_role: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("allow_client_role", &self.allow_client_role)
            .field("default_role", &self.default_role)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if `DATABASE_URL` or `JWT_SECRET` is missing, if the secret is
    /// too short, or if `DEFAULT_ROLE` is outside the valid role set. A
    /// partially configured process must not come up.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL environment variable must be set");

        let jwt_secret =
            env::var("JWT_SECRET").expect("JWT_SECRET environment variable must be set");
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let default_role =
            env::var("DEFAULT_ROLE").unwrap_or_else(|_| ROLE_STUDENT.to_string());
        if !VALID_ROLES.contains(&default_role.as_str()) {
            panic!(
                "DEFAULT_ROLE must be one of {:?}, got {:?}",
                VALID_ROLES, default_role
            );
        }

        Self {
            database_url,
            jwt_secret,
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            allow_client_role: env::var("ALLOW_CLIENT_ROLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            default_role,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
impl Config {
    /// Minimal configuration for unit tests. Not wired to the environment.
    pub(crate) fn for_tests(secret: &str) -> Self {
        Self {
            database_url: "postgres://localhost/unused".to_string(),
            jwt_secret: secret.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            allow_client_role: true,
            default_role: ROLE_STUDENT.to_string(),
        }
    }
}
