use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use serde_json::json;
use thiserror::Error;

/// HTTP-facing wrapper around the service error taxonomy. The message is
/// passed through verbatim so the UI can show the exact reason; only store
/// failures are masked (and logged) since their detail is not the caller's
/// business.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] ServiceError);

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self.0 {
            ServiceError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            ServiceError::Authorization(_) => (StatusCode::FORBIDDEN, "authorization"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServiceError::UnregisteredUser(_) => (StatusCode::FORBIDDEN, "unregistered_user"),
            ServiceError::StaleState => (StatusCode::CONFLICT, "stale_state"),
            ServiceError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "dependency"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        let message = match &self.0 {
            ServiceError::Db(err) => {
                error!("request aborted by store failure: {err}");
                "the reservation store is unavailable".to_owned()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use database::error::ServiceError;
    use sea_orm::DbErr;

    use crate::error::ApiError;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                ServiceError::Validation("bad".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::Authorization("no".to_owned()),
                StatusCode::FORBIDDEN,
            ),
            (ServiceError::NotFound("reservation"), StatusCode::NOT_FOUND),
            (
                ServiceError::UnregisteredUser("a@b.c".to_owned()),
                StatusCode::FORBIDDEN,
            ),
            (ServiceError::StaleState, StatusCode::CONFLICT),
            (
                ServiceError::Db(DbErr::Custom("down".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = ApiError::from(err).status_and_kind();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_validation_message_surfaces_verbatim() {
        let err = ApiError::from(ServiceError::Validation(
            "the end time must be after the start time".to_owned(),
        ));
        assert_eq!(
            err.to_string(),
            "the end time must be after the start time"
        );
    }
}
