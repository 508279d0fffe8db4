use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BanRecord {
    pub user_id: i64,
    pub until: DateTime<Utc>,
}
