//! User repository implementation.
//!
//! The store is keyed by email for authentication purposes; email matching
//! is exact (the column is treated as an opaque string).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address (exact match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Persist a new user; fails with a conflict if the email is taken
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Stamp `last_login` and `updated_at` after a successful login
    async fn record_login(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            last_login: Set(None),
        };

        // The unique index on email is the authoritative uniqueness check.
        // Two racing registrations both pass the service-level lookup; the
        // loser lands here and gets the same conflict the lookup produces.
        let model = active_model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::conflict("Email")
            } else {
                AppError::from(e)
            }
        })?;

        User::try_from(model)
    }

    async fn record_login(&self, id: Uuid) -> AppResult<()> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();
        let now = Utc::now();
        active.last_login = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}
