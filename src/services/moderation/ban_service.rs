use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::queries::bans;
use crate::engine::error::Error;
use crate::platform::ChatPlatform;

/// Ban a user until the given instant.
///
/// The ban record is written first so the consequence survives a restart even
/// if the platform call never lands; the restriction request follows.
pub async fn ban_user(
    pool: &SqlitePool,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    user_id: i64,
    until: DateTime<Utc>,
) -> Result<(), Error> {
    bans::upsert(pool, user_id, until).await?;

    platform.restrict(chat_id, user_id, false, Some(until)).await?;

    info!("User {} banned in chat {} until {}", user_id, chat_id, until);

    Ok(())
}

/// Lift a ban: drop the record and ask the platform to restore sending
pub async fn unban_user(
    pool: &SqlitePool,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    user_id: i64,
) -> Result<(), Error> {
    bans::clear(pool, user_id).await?;

    platform.restrict(chat_id, user_id, true, None).await?;

    info!("User {} unbanned in chat {}", user_id, chat_id);

    Ok(())
}
