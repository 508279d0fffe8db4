//! Line-driven front end for the moderation engine.
//!
//! Real deployments sit behind a chat-platform client; this front end feeds
//! the same typed events from stdin and logs the enforcement calls, which is
//! enough to run and observe the engine locally.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::config::Settings;
use crate::constants::limits::FLOOD_SWEEP_INTERVAL_SECONDS;
use crate::engine::data::Data;
use crate::engine::error::Error;
use crate::handlers::event_handler::{dispatch, EventOutcome, ModerationEvent};
use crate::platform::{ChatPlatform, PlatformError};

const USAGE: &str = "usage: warn|unwarn|ban|unban|remove|promote|demote <chat> <actor> <target> [args..] | msg <chat> <sender> | quit";

/// Platform adapter that logs every enforcement call instead of talking to a
/// real chat backend
pub struct ConsolePlatform;

#[async_trait]
impl ChatPlatform for ConsolePlatform {
    async fn restrict(
        &self,
        chat_id: i64,
        user_id: i64,
        can_send: bool,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), PlatformError> {
        info!(
            "restrict chat={} user={} can_send={} until={:?}",
            chat_id, user_id, can_send, until
        );
        Ok(())
    }

    async fn remove(&self, chat_id: i64, user_id: i64) -> Result<(), PlatformError> {
        info!("remove chat={} user={}", chat_id, user_id);
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PlatformError> {
        info!("send chat={} text={:?}", chat_id, text);
        Ok(())
    }
}

/// Read moderation events from stdin, one per line, and print the outcomes
pub async fn run(settings: Settings, pool: SqlitePool) -> Result<(), Error> {
    let data = Arc::new(Data::new(pool, settings));
    let platform = ConsolePlatform;

    spawn_window_sweeper(data.clone());

    info!("Console ready; {}", USAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let event = match parse_event(line) {
            Ok(event) => event,
            Err(problem) => {
                println!("{}", problem);
                continue;
            }
        };

        match dispatch(&data, &platform, event).await {
            Ok(EventOutcome::Reply(text)) => println!("{}", text),
            Ok(EventOutcome::Throttle(decision)) => {
                if decision.should_restrict {
                    println!("(sender throttled)");
                }
            }
            Ok(EventOutcome::Ignored) => {}
            Err(Error::Database(e)) => error!("Storage failure: {}", e),
            // Authorization, validation and platform rejections are replies
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

/// Periodically drop idle flood windows so per-user state cannot accumulate
fn spawn_window_sweeper(data: Arc<Data>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(
            FLOOD_SWEEP_INTERVAL_SECONDS,
        ));
        loop {
            interval.tick().await;
            data.flood_tracker.sweep(Utc::now());
        }
    });
}

/// Parse one console line into a typed moderation event
fn parse_event(line: &str) -> Result<ModerationEvent, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.as_slice() {
        ["warn", chat, actor, target, reason @ ..] => Ok(ModerationEvent::WarnCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
            reason: join_reason(reason),
        }),
        ["unwarn", chat, actor, target] => Ok(ModerationEvent::UnwarnCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
        }),
        ["ban", chat, actor, target, duration, reason @ ..] => Ok(ModerationEvent::BanCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
            duration: duration.to_string(),
            reason: join_reason(reason),
        }),
        ["unban", chat, actor, target] => Ok(ModerationEvent::UnbanCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
        }),
        ["remove", chat, actor, target] => Ok(ModerationEvent::RemoveCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
        }),
        ["promote", chat, actor, target] => Ok(ModerationEvent::PromoteCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
        }),
        ["demote", chat, actor, target] => Ok(ModerationEvent::DemoteCommand {
            chat_id: parse_id(chat)?,
            actor_id: parse_id(actor)?,
            target_id: parse_id(target)?,
        }),
        ["msg", chat, sender] => Ok(ModerationEvent::OrdinaryMessage {
            chat_id: parse_id(chat)?,
            sender_id: parse_id(sender)?,
            sent_at: Utc::now(),
        }),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_id(token: &str) -> Result<i64, String> {
    token
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a valid id", token))
}

fn join_reason(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}
