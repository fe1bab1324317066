//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// NULL until the first successful login
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// The role column is constrained to the closed set on write; a value
/// outside it means the store was tampered with and surfaces as an
/// internal error, not a client-facing one.
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role = UserRole::try_from(model.role.as_str())
            .map_err(|_| AppError::internal(format!("Unknown role {:?} in store", model.role)))?;

        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            password_hash: model.password_hash,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
            last_login: model.last_login,
        })
    }
}
