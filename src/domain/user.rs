//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_DRIVER, ROLE_STUDENT};
use crate::errors::AppError;

/// User roles enumeration.
///
/// The role set is closed: anything outside it is rejected at the
/// boundary, never coerced to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Driver,
}

impl TryFrom<&str> for UserRole {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            ROLE_STUDENT => Ok(UserRole::Student),
            ROLE_DRIVER => Ok(UserRole::Driver),
            _ => Err(AppError::validation("Invalid role selected")),
        }
    }
}

impl UserRole {
    /// Role name as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => ROLE_STUDENT,
            UserRole::Driver => ROLE_DRIVER,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set on each successful login; `None` until the first one.
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields required to persist a new account.
///
/// Produced by the registration flow after validation and hashing; the
/// store assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Public user profile (safe to return to client).
///
/// Deliberately excludes the password hash and internal timestamps.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    /// User display name
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// User email address
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User phone number
    #[schema(example = "555-0100")]
    pub phone: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::try_from("student").unwrap(), UserRole::Student);
        assert_eq!(UserRole::try_from("driver").unwrap(), UserRole::Driver);
        assert_eq!(UserRole::Student.to_string(), "student");
        assert_eq!(UserRole::Driver.to_string(), "driver");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(UserRole::try_from("admin").is_err());
        assert!(UserRole::try_from("").is_err());
        // Matching is exact, not case-insensitive
        assert!(UserRole::try_from("Student").is_err());
    }

    #[test]
    fn test_profile_excludes_secret_fields() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Student,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login: None,
        };

        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
