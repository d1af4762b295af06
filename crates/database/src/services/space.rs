use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{entities::space, error::ServiceError};

pub struct SpaceService;

impl SpaceService {
    /// Lists the whole catalog. Readable without a registered account.
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<space::Model>, ServiceError> {
        Ok(space::Entity::find()
            .order_by_asc(space::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<space::Model, ServiceError> {
        space::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("space"))
    }
}
