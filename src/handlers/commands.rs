use std::sync::Arc;

use chrono::Utc;

use crate::engine::data::Data;
use crate::engine::error::Error;
use crate::handlers::{notify_admins, require_privileged};
use crate::platform::ChatPlatform;
use crate::services::moderation::{ban_service, duration, warn_service};

const NO_REASON: &str = "no reason given";

/// Warn a user. At the warning threshold the warn escalates into a 30-day ban.
pub async fn handle_warn(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    actor_id: i64,
    target_id: i64,
    reason: Option<&str>,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    let reason = reason.unwrap_or(NO_REASON);
    let result = warn_service::warn_user(&data.pool, platform, chat_id, target_id).await?;

    notify_admins(
        data,
        platform,
        &format!(
            "User {} received a warning in chat {}. Reason: {}. Warnings: {}",
            target_id, chat_id, reason, result.count
        ),
    )
    .await;

    let mut reply = format!(
        "User {} received a warning. Reason: {}. Warnings: {}",
        target_id, reason, result.count
    );

    if let Some(until) = result.banned_until {
        notify_admins(
            data,
            platform,
            &format!(
                "User {} was banned in chat {} until {} after reaching {} warnings.",
                target_id, chat_id, until, result.count
            ),
        )
        .await;
        reply.push_str(&format!(
            "\nUser {} has been banned for 30 days after reaching {} warnings.",
            target_id, result.count
        ));
    }

    Ok(reply)
}

/// Reset a user's warning count to zero
pub async fn handle_unwarn(
    data: &Arc<Data>,
    _platform: &dyn ChatPlatform,
    _chat_id: i64,
    actor_id: i64,
    target_id: i64,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    warn_service::clear_warnings(&data.pool, target_id).await?;

    Ok(format!("All warnings for user {} have been cleared.", target_id))
}

/// Ban a user for the parsed duration. The token is validated before any
/// state is touched; a malformed token rejects the command outright.
pub async fn handle_ban(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    actor_id: i64,
    target_id: i64,
    duration_token: &str,
    reason: Option<&str>,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    let delta = duration::parse_ban_duration(duration_token)
        .ok_or_else(|| Error::InvalidDuration(duration_token.to_string()))?;
    let until = Utc::now() + delta;
    let reason = reason.unwrap_or(NO_REASON);

    ban_service::ban_user(&data.pool, platform, chat_id, target_id, until).await?;

    notify_admins(
        data,
        platform,
        &format!(
            "User {} was banned for {} in chat {}. Reason: {}",
            target_id, duration_token, chat_id, reason
        ),
    )
    .await;

    Ok(format!(
        "User {} has been banned for {}. Reason: {}",
        target_id, duration_token, reason
    ))
}

/// Lift a user's ban and restore their ability to send messages
pub async fn handle_unban(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    actor_id: i64,
    target_id: i64,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    ban_service::unban_user(&data.pool, platform, chat_id, target_id).await?;

    notify_admins(
        data,
        platform,
        &format!("User {} was unbanned in chat {}.", target_id, chat_id),
    )
    .await;

    Ok(format!("User {} has been unbanned.", target_id))
}

/// Permanently remove a user from the chat. A platform refusal is reported
/// to the actor with the underlying reason and does not notify admins.
pub async fn handle_remove(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    actor_id: i64,
    target_id: i64,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    match platform.remove(chat_id, target_id).await {
        Ok(()) => {
            notify_admins(
                data,
                platform,
                &format!("User {} was removed from chat {}.", target_id, chat_id),
            )
            .await;
            Ok(format!("User {} has been removed from the chat.", target_id))
        }
        Err(e) => Ok(format!("Failed to remove user {}: {}", target_id, e)),
    }
}

/// Grant a user moderator privileges
pub async fn handle_promote(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    actor_id: i64,
    target_id: i64,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    if !data.roles.promote(target_id) {
        return Ok(format!("User {} is already privileged.", target_id));
    }

    notify_admins(
        data,
        platform,
        &format!("User {} is now a moderator of chat {}.", target_id, chat_id),
    )
    .await;

    Ok(format!("User {} is now a moderator.", target_id))
}

/// Revoke a user's moderator privileges
pub async fn handle_demote(
    data: &Arc<Data>,
    platform: &dyn ChatPlatform,
    chat_id: i64,
    actor_id: i64,
    target_id: i64,
) -> Result<String, Error> {
    require_privileged(data, actor_id)?;

    if !data.roles.demote(target_id) {
        return Ok(format!("User {} is not a moderator.", target_id));
    }

    notify_admins(
        data,
        platform,
        &format!("User {} is no longer a moderator of chat {}.", target_id, chat_id),
    )
    .await;

    Ok(format!("User {} is no longer a moderator.", target_id))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::config::Settings;
    use crate::db::pool::test_pool;
    use crate::db::queries::{bans, warnings};
    use crate::platform::testing::{Call, RecordingPlatform};

    const CHAT: i64 = 100;
    const ADMIN: i64 = 1;
    const TARGET: i64 = 42;
    const STRANGER: i64 = 999;

    async fn test_data() -> Arc<Data> {
        test_data_with_admins(vec![ADMIN]).await
    }

    async fn test_data_with_admins(admins: Vec<i64>) -> Arc<Data> {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            admins,
            chats: vec![CHAT],
        };
        Arc::new(Data::new(test_pool().await, settings))
    }

    #[tokio::test]
    async fn test_warn_increments_and_notifies() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let reply = handle_warn(&data, &platform, CHAT, ADMIN, TARGET, Some("spam links"))
            .await
            .unwrap();

        assert!(reply.contains("Warnings: 1"));
        assert!(reply.contains("spam links"));
        assert_eq!(warnings::get_count(&data.pool, TARGET).await.unwrap(), 1);
        assert!(bans::get(&data.pool, TARGET).await.unwrap().is_none());

        let admin_messages = platform.messages_to(ADMIN);
        assert_eq!(admin_messages.len(), 1);
        assert!(admin_messages[0].contains("received a warning"));
    }

    #[tokio::test]
    async fn test_warn_without_reason_uses_placeholder() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let reply = handle_warn(&data, &platform, CHAT, ADMIN, TARGET, None)
            .await
            .unwrap();

        assert!(reply.contains("no reason given"));
    }

    #[tokio::test]
    async fn test_third_warning_escalates_to_ban() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        for _ in 0..2 {
            handle_warn(&data, &platform, CHAT, ADMIN, TARGET, None)
                .await
                .unwrap();
        }
        let reply = handle_warn(&data, &platform, CHAT, ADMIN, TARGET, None)
            .await
            .unwrap();

        assert!(reply.contains("banned for 30 days"));
        assert_eq!(warnings::get_count(&data.pool, TARGET).await.unwrap(), 3);

        let ban = bans::get(&data.pool, TARGET).await.unwrap().unwrap();
        let expected = Utc::now() + Duration::days(30);
        assert!((ban.until - expected).num_seconds().abs() < 5);

        let restriction = platform.restrictions().pop().unwrap();
        assert!(matches!(
            restriction,
            Call::Restrict { chat_id: CHAT, user_id: TARGET, can_send: false, until: Some(_) }
        ));
    }

    #[tokio::test]
    async fn test_unwarn_resets_count() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        handle_warn(&data, &platform, CHAT, ADMIN, TARGET, None)
            .await
            .unwrap();
        let reply = handle_unwarn(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        assert!(reply.contains("cleared"));
        assert_eq!(warnings::get_count(&data.pool, TARGET).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ban_parses_duration_and_restricts() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let reply = handle_ban(&data, &platform, CHAT, ADMIN, TARGET, "7day", Some("flooding"))
            .await
            .unwrap();

        assert!(reply.contains("banned for 7day"));

        let ban = bans::get(&data.pool, TARGET).await.unwrap().unwrap();
        let expected = Utc::now() + Duration::days(7);
        assert!((ban.until - expected).num_seconds().abs() < 5);

        assert_eq!(platform.restrictions().len(), 1);
        assert_eq!(platform.messages_to(ADMIN).len(), 1);
    }

    #[tokio::test]
    async fn test_ban_rejects_malformed_duration() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        for token in ["abc", "7"] {
            let err = handle_ban(&data, &platform, CHAT, ADMIN, TARGET, token, None)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidDuration(_)));
        }

        // Rejection is pure validation: nothing was stored, nobody was called
        assert!(bans::get(&data.pool, TARGET).await.unwrap().is_none());
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ban_replaces_prior_ban() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        handle_ban(&data, &platform, CHAT, ADMIN, TARGET, "1hour", None)
            .await
            .unwrap();
        handle_ban(&data, &platform, CHAT, ADMIN, TARGET, "30minute", None)
            .await
            .unwrap();

        let ban = bans::get(&data.pool, TARGET).await.unwrap().unwrap();
        let expected = Utc::now() + Duration::minutes(30);
        assert!((ban.until - expected).num_seconds().abs() < 5);
    }

    #[tokio::test]
    async fn test_unban_clears_record_and_lifts_restriction() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        handle_ban(&data, &platform, CHAT, ADMIN, TARGET, "7day", None)
            .await
            .unwrap();
        let reply = handle_unban(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        assert!(reply.contains("unbanned"));
        assert!(bans::get(&data.pool, TARGET).await.unwrap().is_none());

        let lift = platform.restrictions().pop().unwrap();
        assert!(matches!(
            lift,
            Call::Restrict { chat_id: CHAT, user_id: TARGET, can_send: true, until: None }
        ));
    }

    #[tokio::test]
    async fn test_remove_reports_and_notifies() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let reply = handle_remove(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        assert!(reply.contains("removed"));
        assert!(platform.calls().contains(&Call::Remove {
            chat_id: CHAT,
            user_id: TARGET
        }));
        assert_eq!(platform.messages_to(ADMIN).len(), 1);
    }

    #[tokio::test]
    async fn test_remove_failure_reaches_actor_not_admins() {
        let data = test_data().await;
        let platform = RecordingPlatform {
            fail_remove: true,
            ..RecordingPlatform::new()
        };

        let reply = handle_remove(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        assert!(reply.contains("Failed to remove user 42"));
        assert!(reply.contains("administrator of the chat"));
        assert!(platform.messages_to(ADMIN).is_empty());
    }

    #[tokio::test]
    async fn test_promote_then_acting_as_moderator() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let reply = handle_promote(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();
        assert!(reply.contains("now a moderator"));

        // The new moderator can issue commands
        handle_warn(&data, &platform, CHAT, TARGET, STRANGER, None)
            .await
            .unwrap();
        assert_eq!(warnings::get_count(&data.pool, STRANGER).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_promote_twice_reports_already_privileged() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        handle_promote(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();
        let reply = handle_promote(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        assert!(reply.contains("already privileged"));
        // Only the first promote notified the admins
        assert_eq!(platform.messages_to(ADMIN).len(), 1);
    }

    #[tokio::test]
    async fn test_demote_non_moderator_reports_without_notifying() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let reply = handle_demote(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        assert!(reply.contains("not a moderator"));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_demote_revokes_privilege() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        handle_promote(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();
        handle_demote(&data, &platform, CHAT, ADMIN, TARGET)
            .await
            .unwrap();

        let err = handle_warn(&data, &platform, CHAT, TARGET, STRANGER, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_every_command_rejects_unprivileged_actors() {
        let data = test_data().await;
        let platform = RecordingPlatform::new();

        let results = vec![
            handle_warn(&data, &platform, CHAT, STRANGER, TARGET, None).await,
            handle_unwarn(&data, &platform, CHAT, STRANGER, TARGET).await,
            handle_ban(&data, &platform, CHAT, STRANGER, TARGET, "7day", None).await,
            handle_unban(&data, &platform, CHAT, STRANGER, TARGET).await,
            handle_remove(&data, &platform, CHAT, STRANGER, TARGET).await,
            handle_promote(&data, &platform, CHAT, STRANGER, TARGET).await,
            handle_demote(&data, &platform, CHAT, STRANGER, TARGET).await,
        ];

        for result in results {
            assert!(matches!(result, Err(Error::PermissionDenied(_))));
        }

        // No store was touched and no platform call was made
        assert_eq!(warnings::get_count(&data.pool, TARGET).await.unwrap(), 0);
        assert!(bans::get(&data.pool, TARGET).await.unwrap().is_none());
        assert!(!data.roles.is_privileged(TARGET));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_one_unreachable_admin_does_not_stop_fanout() {
        let data = test_data_with_admins(vec![1, 2, 3]).await;
        let platform = RecordingPlatform {
            fail_message_to: [2].into(),
            ..RecordingPlatform::new()
        };

        let reply = handle_warn(&data, &platform, CHAT, 1, TARGET, None)
            .await
            .unwrap();

        assert!(reply.contains("Warnings: 1"));
        assert_eq!(platform.messages_to(1).len(), 1);
        assert!(platform.messages_to(2).is_empty());
        assert_eq!(platform.messages_to(3).len(), 1);
    }
}
