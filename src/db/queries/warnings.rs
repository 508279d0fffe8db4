use sqlx::SqlitePool;

use crate::db::models::WarningRecord;

pub async fn get(pool: &SqlitePool, user_id: i64) -> Result<Option<WarningRecord>, sqlx::Error> {
    sqlx::query_as::<_, WarningRecord>("SELECT user_id, warns FROM warnings WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Current warning count; 0 when the user has no record
pub async fn get_count(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    Ok(get(pool, user_id).await?.map(|r| r.warns).unwrap_or(0))
}

/// Upsert a warning. The whole increment runs in one statement so concurrent
/// warns for the same user cannot lose updates.
pub async fn increment(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO warnings (user_id, warns) VALUES (?, 1) \
         ON CONFLICT(user_id) DO UPDATE SET warns = warns + 1",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Drop the user's record entirely; subsequent reads see 0
pub async fn reset(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM warnings WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::test_pool;

    #[tokio::test]
    async fn test_count_defaults_to_zero() {
        let pool = test_pool().await;
        assert_eq!(get_count(&pool, 42).await.unwrap(), 0);
        assert!(get(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sequential_increments() {
        let pool = test_pool().await;
        for _ in 0..5 {
            increment(&pool, 42).await.unwrap();
        }
        assert_eq!(get_count(&pool, 42).await.unwrap(), 5);

        let record = get(&pool, 42).await.unwrap().unwrap();
        assert_eq!(record.user_id, 42);
        assert_eq!(record.warns, 5);
    }

    #[tokio::test]
    async fn test_concurrent_increments_lose_nothing() {
        let pool = test_pool().await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                increment(&pool, 42).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(get_count(&pool, 42).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_reset_clears_any_count() {
        let pool = test_pool().await;
        for _ in 0..3 {
            increment(&pool, 42).await.unwrap();
        }
        reset(&pool, 42).await.unwrap();
        assert_eq!(get_count(&pool, 42).await.unwrap(), 0);

        // Resetting a user with no record is a no-op
        reset(&pool, 99).await.unwrap();
        assert_eq!(get_count(&pool, 99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counts_are_per_user() {
        let pool = test_pool().await;
        increment(&pool, 1).await.unwrap();
        increment(&pool, 2).await.unwrap();
        increment(&pool, 2).await.unwrap();
        assert_eq!(get_count(&pool, 1).await.unwrap(), 1);
        assert_eq!(get_count(&pool, 2).await.unwrap(), 2);
    }
}
