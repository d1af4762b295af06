use axum::Json;
use database::{db::create_connection, entities::user, error::ServiceError, services::user::UserService};

use crate::{
    dtos::user::{LoginRequest, UserResponse},
    error::ApiError,
};

/// Resolves an authenticated identity (email) to its internal account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Account found", body = UserResponse),
        (status = 403, description = "No account is registered for this identity"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<UserResponse>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let user = UserService::resolve_by_email(&db, payload.email.trim()).await?;

    Ok(Json(to_user_response(user)))
}

pub(crate) fn to_user_response(user: user::Model) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        role: user.role.to_string(),
    }
}
