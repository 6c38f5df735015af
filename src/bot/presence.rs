//! Default presence from the `[presence]` config section.

use serenity::all::{ActivityData, Context, OnlineStatus, ShardInfo};

use crate::config::PresenceConfig;

/// Presence sent when a shard identifies, until its ready handler applies the configured one.
pub fn reconnecting_presence() -> (ActivityData, OnlineStatus) {
    (ActivityData::playing("Reconnecting..."), OnlineStatus::DoNotDisturb)
}

/// Presence text, suffixed with the shard ID when the bot runs more than one shard.
pub fn presence_text(text: &str, shard: Option<ShardInfo>) -> String {
    match shard {
        Some(info) if info.total > 1 && !text.is_empty() => format!("{} (shard {})", text, info.id.0),
        _ => text.to_string(),
    }
}

/// Parses a status name. Unknown names fall back to online.
pub fn parse_status(status: &str) -> OnlineStatus {
    match status.to_lowercase().as_str() {
        "online" => OnlineStatus::Online,
        "idle" => OnlineStatus::Idle,
        "dnd" | "do_not_disturb" => OnlineStatus::DoNotDisturb,
        "invisible" | "offline" => OnlineStatus::Invisible,
        other => {
            tracing::warn!("Unknown presence status {:?}, using online", other);
            OnlineStatus::Online
        }
    }
}

/// Builds the activity for the configured type and text.
///
/// # Returns
/// - `Some(ActivityData)` - Activity to show
/// - `None` - Text is empty, so no activity is shown
pub fn build_activity(config: &PresenceConfig, text: String) -> Option<ActivityData> {
    if text.is_empty() {
        return None;
    }

    let activity = match config.activity_type.to_lowercase().as_str() {
        "playing" => ActivityData::playing(text),
        "listening" => ActivityData::listening(text),
        "watching" => ActivityData::watching(text),
        "competing" => ActivityData::competing(text),
        "custom" => ActivityData::custom(text),
        "streaming" => {
            let url = config.url.as_deref().unwrap_or_default();
            match ActivityData::streaming(text.clone(), url) {
                Ok(activity) => activity,
                Err(e) => {
                    tracing::warn!("Invalid stream URL {:?} ({}), using playing", url, e);
                    ActivityData::playing(text)
                }
            }
        }
        other => {
            tracing::warn!("Unknown activity type {:?}, using playing", other);
            ActivityData::playing(text)
        }
    };

    Some(activity)
}

/// Sets the shard's presence from the configuration.
pub fn set_default_presence(ctx: &Context, config: &PresenceConfig, shard: Option<ShardInfo>) {
    tracing::info!("Setting default bot presence");

    let text = presence_text(&config.text, shard);
    let activity = build_activity(config, text);
    let status = parse_status(&config.status);

    ctx.set_presence(activity, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::all::{ActivityType, ShardId};

    fn presence(activity_type: &str, text: &str) -> PresenceConfig {
        PresenceConfig {
            activity_type: activity_type.to_string(),
            text: text.to_string(),
            ..PresenceConfig::default()
        }
    }

    #[test]
    fn suffixes_shard_when_sharded() {
        let shard = ShardInfo { id: ShardId(3), total: 4 };

        assert_eq!(presence_text("hello", Some(shard)), "hello (shard 3)");
    }

    #[test]
    fn no_suffix_for_single_shard() {
        let shard = ShardInfo { id: ShardId(0), total: 1 };

        assert_eq!(presence_text("hello", Some(shard)), "hello");
        assert_eq!(presence_text("hello", None), "hello");
    }

    #[test]
    fn builds_configured_activity() {
        let activity = build_activity(&presence("Watching", "you"), "you".to_string()).unwrap();

        assert_eq!(activity.kind, ActivityType::Watching);
        assert_eq!(activity.name, "you");
    }

    #[test]
    fn unknown_activity_falls_back_to_playing() {
        let activity = build_activity(&presence("dancing", "x"), "x".to_string()).unwrap();

        assert_eq!(activity.kind, ActivityType::Playing);
    }

    #[test]
    fn streaming_without_url_falls_back_to_playing() {
        let activity = build_activity(&presence("streaming", "live"), "live".to_string()).unwrap();

        assert_eq!(activity.kind, ActivityType::Playing);
    }

    #[test]
    fn empty_text_has_no_activity() {
        assert!(build_activity(&presence("playing", ""), String::new()).is_none());
    }

    #[test]
    fn reconnecting_until_ready() {
        let (activity, status) = reconnecting_presence();

        assert_eq!(activity.kind, ActivityType::Playing);
        assert_eq!(activity.name, "Reconnecting...");
        assert_eq!(status, OnlineStatus::DoNotDisturb);
    }

    #[test]
    fn parses_statuses() {
        assert_eq!(parse_status("dnd"), OnlineStatus::DoNotDisturb);
        assert_eq!(parse_status("IDLE"), OnlineStatus::Idle);
        assert_eq!(parse_status("invisible"), OnlineStatus::Invisible);
        assert_eq!(parse_status("sleepy"), OnlineStatus::Online);
    }
}
