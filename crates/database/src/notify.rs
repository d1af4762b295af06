use async_trait::async_trait;
use log::info;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
#[error("notification dispatch failed: {0}")]
pub struct NotifyError(pub String);

/// Delivery seam for status-change notifications. The workflow only needs a
/// recipient and a message; how it reaches the user is someone else's
/// problem. Dispatch is best-effort and must never fail the action that
/// triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: Uuid, message: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the application log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: Uuid, message: &str) -> Result<(), NotifyError> {
        info!("notify user {user_id}: {message}");
        Ok(())
    }
}
