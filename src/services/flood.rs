use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::constants::limits::{FLOOD_MESSAGE_LIMIT, FLOOD_WINDOW_SECONDS};

/// Result of feeding one message into the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodDecision {
    pub over_limit: bool,
    /// Messages inside the window at the moment of the check
    pub current_count: usize,
}

/// Tracks per-user message timestamps inside a trailing window.
///
/// State is memory-only and resets with the process; a restart forgives an
/// in-flight burst but never a recorded ban or warning.
pub struct FloodTracker {
    /// user_id -> timestamps of messages, oldest first
    windows: DashMap<i64, VecDeque<DateTime<Utc>>>,
}

impl FloodTracker {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Record a message and decide whether the user crossed the flood limit.
    ///
    /// Appends `now`, prunes entries older than the trailing window, and trips
    /// once the pruned window holds more than the limit. Tripping clears the
    /// user's window so the same burst cannot re-fire on the next message; a
    /// user who keeps flooding must exceed the limit again. The entry guard
    /// keeps the whole cycle exclusive per user, while distinct users proceed
    /// in parallel.
    pub fn record_and_check(&self, user_id: i64, now: DateTime<Utc>) -> FloodDecision {
        let mut window = self.windows.entry(user_id).or_insert_with(VecDeque::new);

        window.push_back(now);

        // Remove old events outside the window
        let cutoff = now - Duration::seconds(FLOOD_WINDOW_SECONDS);
        while let Some(front) = window.front() {
            if *front < cutoff {
                window.pop_front();
            } else {
                break;
            }
        }

        let current_count = window.len();
        if current_count > FLOOD_MESSAGE_LIMIT {
            window.clear();
            return FloodDecision {
                over_limit: true,
                current_count,
            };
        }

        FloodDecision {
            over_limit: false,
            current_count,
        }
    }

    /// Drop users whose newest message already left the window, so the map
    /// does not grow with every user ever seen
    pub fn sweep(&self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(FLOOD_WINDOW_SECONDS);
        self.windows
            .retain(|_, window| window.back().map(|t| *t >= cutoff).unwrap_or(false));
    }
}

impl Default for FloodTracker {
    fn default() -> Self {
        Self::new()
    }
}
