use std::fmt;

use sqlx::SqlitePool;

use crate::config::Settings;
use crate::services::flood::FloodTracker;
use crate::services::roles::RoleRegistry;

/// Shared state available to every event handler
pub struct Data {
    pub pool: SqlitePool,
    pub settings: Settings,
    /// Configured administrators plus runtime-promoted moderators
    pub roles: RoleRegistry,
    /// Per-user message timestamps for flood detection
    pub flood_tracker: FloodTracker,
}

impl Data {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        let roles = RoleRegistry::new(settings.admins.iter().copied().collect());
        Self {
            pool,
            settings,
            roles,
            flood_tracker: FloodTracker::new(),
        }
    }

    /// Whether the engine moderates the given chat
    pub fn is_tracked_chat(&self, chat_id: i64) -> bool {
        self.settings.chats.contains(&chat_id)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("admin_count", &self.settings.admins.len())
            .field("tracked_chat_count", &self.settings.chats.len())
            .finish_non_exhaustive()
    }
}
