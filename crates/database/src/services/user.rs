use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{entities::user, error::ServiceError};

pub struct UserService;

impl UserService {
    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// The access gate: maps an external identity (email) to the internal
    /// account. Identities without an account may browse spaces but cannot
    /// create or act on reservations.
    pub async fn resolve_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<user::Model, ServiceError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::UnregisteredUser(email.to_owned()))
    }
}
