#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WarningRecord {
    pub user_id: i64,
    pub warns: i64,
}
