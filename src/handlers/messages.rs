use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::constants::limits::FLOOD_RESTRICT_SECONDS;
use crate::engine::data::Data;
use crate::engine::error::Error;
use crate::platform::ChatPlatform;

const THROTTLE_NOTICE: &str =
    "User has been automatically restricted for 3 minutes for exceeding the message limit.";

/// Outcome of feeding an ordinary message through the flood check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDecision {
    pub should_restrict: bool,
}

/// Track an ordinary chat message and throttle the sender if the flood limit
/// trips. Flooding earns a 3-minute platform restriction and a notice to the
/// chat; admins are not notified.
pub async fn handle_incoming_message(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    sender_id: i64,
    sent_at: DateTime<Utc>,
) -> Result<ThrottleDecision, Error> {
    let decision = data.flood_tracker.record_and_check(sender_id, sent_at);

    if !decision.over_limit {
        return Ok(ThrottleDecision {
            should_restrict: false,
        });
    }

    let until = sent_at + Duration::seconds(FLOOD_RESTRICT_SECONDS);
    platform.restrict(chat_id, sender_id, false, Some(until)).await?;

    // The restriction is already in place; a lost notice only costs visibility
    if let Err(e) = platform.send_message(chat_id, THROTTLE_NOTICE).await {
        warn!("Failed to post throttle notice in chat {}: {}", chat_id, e);
    }

    info!(
        "User {} throttled in chat {} after {} messages inside the flood window",
        sender_id, chat_id, decision.current_count
    );

    Ok(ThrottleDecision {
        should_restrict: true,
    })
}
