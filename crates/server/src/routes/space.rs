use axum::{Json, extract::Path};
use database::{
    db::create_connection, entities::space, error::ServiceError, services::space::SpaceService,
};
use sea_orm::prelude::Uuid;

use crate::{dtos::space::SpaceResponse, error::ApiError};

/// Get the catalog of bookable spaces
#[utoipa::path(
    get,
    path = "/spaces",
    responses(
        (status = 200, description = "List of spaces retrieved successfully", body = [SpaceResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Spaces"
)]
pub async fn get_spaces() -> Result<Json<Vec<SpaceResponse>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let spaces = SpaceService::list(&db).await?;

    Ok(Json(spaces.into_iter().map(to_space_response).collect()))
}

/// Get a specific space by ID
#[utoipa::path(
    get,
    path = "/spaces/{id}",
    params(
        ("id" = Uuid, Path, description = "Space ID")
    ),
    responses(
        (status = 200, description = "Space found", body = SpaceResponse),
        (status = 404, description = "Space not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Spaces"
)]
pub async fn get_space_by_id(Path(id): Path<Uuid>) -> Result<Json<SpaceResponse>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let space = SpaceService::get(&db, id).await?;

    Ok(Json(to_space_response(space)))
}

fn to_space_response(space: space::Model) -> SpaceResponse {
    SpaceResponse {
        id: space.id.to_string(),
        name: space.name,
        description: space.description,
        location: space.location,
        capacity: space.capacity,
    }
}
