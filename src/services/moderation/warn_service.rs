use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::constants::limits::{ESCALATION_BAN_DAYS, WARN_BAN_THRESHOLD};
use crate::db::queries::warnings;
use crate::engine::error::Error;
use crate::platform::ChatPlatform;
use crate::services::moderation::ban_service;

pub struct WarnResult {
    pub count: i64,
    /// Set when this warning crossed the threshold and triggered a ban
    pub banned_until: Option<DateTime<Utc>>,
}

/// Record a warning and escalate to a ban once the threshold is reached.
///
/// The count is re-read after the increment and compared against the
/// threshold; at or above it the user receives the same ban an explicit
/// 30-day ban command would issue. A crash between the increment and the ban
/// write leaves the raised count without the ban; the next warning completes
/// the escalation.
pub async fn warn_user(
    pool: &SqlitePool,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    user_id: i64,
) -> Result<WarnResult, Error> {
    warnings::increment(pool, user_id).await?;
    let count = warnings::get_count(pool, user_id).await?;

    info!("User {} warned in chat {} (warnings: {})", user_id, chat_id, count);

    if count >= WARN_BAN_THRESHOLD {
        let until = Utc::now() + Duration::days(ESCALATION_BAN_DAYS);
        ban_service::ban_user(pool, platform, chat_id, user_id, until).await?;
        return Ok(WarnResult {
            count,
            banned_until: Some(until),
        });
    }

    Ok(WarnResult {
        count,
        banned_until: None,
    })
}

/// Reset the user's warning count to zero
pub async fn clear_warnings(pool: &SqlitePool, user_id: i64) -> Result<(), Error> {
    warnings::reset(pool, user_id).await?;

    info!("Cleared warnings for user {}", user_id);

    Ok(())
}
