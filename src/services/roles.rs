use std::collections::HashSet;

use dashmap::DashSet;
use tracing::info;

/// Administrators plus the runtime moderator set.
///
/// Administrators come from configuration and never change; moderators are
/// promoted and demoted while the process runs and are deliberately not
/// persisted. The set is shared by reference across handlers; the `DashSet`
/// keeps mutation safe without external locking.
pub struct RoleRegistry {
    admins: HashSet<i64>,
    moderators: DashSet<i64>,
}

impl RoleRegistry {
    pub fn new(admins: HashSet<i64>) -> Self {
        Self {
            admins,
            moderators: DashSet::new(),
        }
    }

    /// True for configured administrators and promoted moderators
    pub fn is_privileged(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id) || self.moderators.contains(&user_id)
    }

    /// Add a moderator. Returns false when the user was already privileged
    /// (an administrator or an existing moderator) and nothing changed.
    pub fn promote(&self, user_id: i64) -> bool {
        if self.admins.contains(&user_id) {
            return false;
        }
        let added = self.moderators.insert(user_id);
        if added {
            info!("User {} promoted to moderator", user_id);
        }
        added
    }

    /// Remove a moderator. Returns false when the user was not a moderator.
    pub fn demote(&self, user_id: i64) -> bool {
        let removed = self.moderators.remove(&user_id).is_some();
        if removed {
            info!("User {} demoted from moderator", user_id);
        }
        removed
    }
}
