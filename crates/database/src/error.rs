use models::workflow::WorkflowError;
use sea_orm::DbErr;
use thiserror::Error;

/// Everything a service call can fail with. Validation and authorization
/// failures are detected before any mutation; `StaleState` means another
/// request won a concurrent race on the same reservation.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("no account is registered for {0}")]
    UnregisteredUser(String),

    #[error("the reservation was changed by another request, reload and retry")]
    StaleState,

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl From<WorkflowError> for ServiceError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(message) => Self::Validation(message),
            WorkflowError::Authorization(message) => Self::Authorization(message),
        }
    }
}
