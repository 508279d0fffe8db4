use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error returned by a chat platform call. Carries the platform's own
/// description of the failure so it can be surfaced to the actor verbatim.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct PlatformError(pub String);

/// Boundary to the chat platform the engine enforces its decisions on.
///
/// The engine owns the decision; implementations own the transport. None of
/// these calls are retried by the core — a failure is reported back to the
/// caller of the originating command.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Apply or lift a send restriction for a user in a chat. `until` is
    /// ignored when the restriction is being lifted.
    async fn restrict(
        &self,
        chat_id: i64,
        user_id: i64,
        can_send: bool,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), PlatformError>;

    /// Permanently remove a user from a chat.
    async fn remove(&self, chat_id: i64, user_id: i64) -> Result<(), PlatformError>;

    /// Send a text message to a chat (or to a user, for admin notifications).
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PlatformError>;
}
