pub mod commands;
pub mod event_handler;
pub mod messages;

use tracing::error;

use crate::engine::data::Data;
use crate::engine::error::Error;
use crate::platform::ChatPlatform;

/// Reject the command unless the actor is an administrator or moderator.
/// Runs before any side effect; a failure mutates nothing and notifies nobody.
fn require_privileged(data: &Data, actor_id: i64) -> Result<(), Error> {
    if data.roles.is_privileged(actor_id) {
        Ok(())
    } else {
        Err(Error::PermissionDenied(
            "You do not have permission to use this command.".to_string(),
        ))
    }
}

/// Send `text` to every configured administrator. Delivery failures are
/// logged per admin and never abort the command or the remaining sends.
pub(crate) async fn notify_admins(data: &Data, platform: &dyn ChatPlatform, text: &str) {
    for &admin_id in &data.settings.admins {
        if let Err(e) = platform.send_message(admin_id, text).await {
            error!("Failed to notify admin {}: {}", admin_id, e);
        }
    }
}
