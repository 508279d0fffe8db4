use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::BanRecord;

pub async fn get(pool: &SqlitePool, user_id: i64) -> Result<Option<BanRecord>, sqlx::Error> {
    sqlx::query_as::<_, BanRecord>("SELECT user_id, until FROM bans WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Record a ban, replacing any prior record for the user (last writer wins)
pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    until: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR REPLACE INTO bans (user_id, until) VALUES (?, ?)")
        .bind(user_id)
        .bind(until)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove the ban record if present; not an error when absent
pub async fn clear(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM bans WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
