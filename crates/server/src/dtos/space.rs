use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SpaceResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub capacity: i32,
}
