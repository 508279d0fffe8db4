use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::engine::data::Data;
use crate::engine::error::Error;
use crate::handlers::messages::ThrottleDecision;
use crate::handlers::{commands, messages};
use crate::platform::ChatPlatform;

/// Every input the engine reacts to, already parsed by the platform glue
#[derive(Debug, Clone)]
pub enum ModerationEvent {
    WarnCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
        reason: Option<String>,
    },
    UnwarnCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
    },
    BanCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
        duration: String,
        reason: Option<String>,
    },
    UnbanCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
    },
    RemoveCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
    },
    PromoteCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
    },
    DemoteCommand {
        chat_id: i64,
        actor_id: i64,
        target_id: i64,
    },
    OrdinaryMessage {
        chat_id: i64,
        sender_id: i64,
        sent_at: DateTime<Utc>,
    },
}

impl ModerationEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::WarnCommand { chat_id, .. }
            | Self::UnwarnCommand { chat_id, .. }
            | Self::BanCommand { chat_id, .. }
            | Self::UnbanCommand { chat_id, .. }
            | Self::RemoveCommand { chat_id, .. }
            | Self::PromoteCommand { chat_id, .. }
            | Self::DemoteCommand { chat_id, .. }
            | Self::OrdinaryMessage { chat_id, .. } => *chat_id,
        }
    }
}

#[derive(Debug)]
pub enum EventOutcome {
    /// Text to post back to the originating chat
    Reply(String),
    /// Flood-check result for an ordinary message
    Throttle(ThrottleDecision),
    /// The event happened outside the tracked chats
    Ignored,
}

/// Route one event to its handler. The single dispatch point keeps the
/// event-to-handler mapping independent of any platform framework.
pub async fn dispatch(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    event: ModerationEvent,
) -> Result<EventOutcome, Error> {
    if !data.is_tracked_chat(event.chat_id()) {
        debug!("Ignoring event in untracked chat {}", event.chat_id());
        return Ok(EventOutcome::Ignored);
    }

    match event {
        ModerationEvent::WarnCommand {
            chat_id,
            actor_id,
            target_id,
            reason,
        } => commands::handle_warn(data, platform, chat_id, actor_id, target_id, reason.as_deref())
            .await
            .map(EventOutcome::Reply),

        ModerationEvent::UnwarnCommand {
            chat_id,
            actor_id,
            target_id,
        } => commands::handle_unwarn(data, platform, chat_id, actor_id, target_id)
            .await
            .map(EventOutcome::Reply),

        ModerationEvent::BanCommand {
            chat_id,
            actor_id,
            target_id,
            duration,
            reason,
        } => commands::handle_ban(
            data,
            platform,
            chat_id,
            actor_id,
            target_id,
            &duration,
            reason.as_deref(),
        )
        .await
        .map(EventOutcome::Reply),

        ModerationEvent::UnbanCommand {
            chat_id,
            actor_id,
            target_id,
        } => commands::handle_unban(data, platform, chat_id, actor_id, target_id)
            .await
            .map(EventOutcome::Reply),

        ModerationEvent::RemoveCommand {
            chat_id,
            actor_id,
            target_id,
        } => commands::handle_remove(data, platform, chat_id, actor_id, target_id)
            .await
            .map(EventOutcome::Reply),

        ModerationEvent::PromoteCommand {
            chat_id,
            actor_id,
            target_id,
        } => commands::handle_promote(data, platform, chat_id, actor_id, target_id)
            .await
            .map(EventOutcome::Reply),

        ModerationEvent::DemoteCommand {
            chat_id,
            actor_id,
            target_id,
        } => commands::handle_demote(data, platform, chat_id, actor_id, target_id)
            .await
            .map(EventOutcome::Reply),

        ModerationEvent::OrdinaryMessage {
            chat_id,
            sender_id,
            sent_at,
        } => messages::handle_incoming_message(data, platform, chat_id, sender_id, sent_at)
            .await
            .map(EventOutcome::Throttle),
    }
}
