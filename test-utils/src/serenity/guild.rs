//! Test factory for creating Serenity Guild objects.

use serde_json::{json, Value};
use serenity::all::{Guild, Permissions};

/// Creates a test Serenity Guild with roles and text channels and no cached members.
///
/// The `@everyone` role shares the guild's ID, so include `(guild_id, permissions)` in
/// `roles` to set the base permissions.
///
/// # Arguments
/// - `guild_id` - Discord guild ID
/// - `owner_id` - Guild owner, who always has every permission
/// - `roles` - Role IDs and their guild level permissions
/// - `channel_ids` - Text channels without permission overwrites
///
/// # Panics
/// - If the JSON cannot be deserialized into a Guild (indicates invalid test data)
pub fn create_test_guild(
    guild_id: u64,
    owner_id: u64,
    roles: &[(u64, Permissions)],
    channel_ids: &[u64],
) -> Guild {
    let roles: Vec<Value> = roles
        .iter()
        .map(|(id, permissions)| role_json(*id, *permissions))
        .collect();
    let channels: Vec<Value> = channel_ids
        .iter()
        .map(|id| {
            json!({
                "id": id.to_string(),
                "guild_id": guild_id.to_string(),
                "type": 0,
                "name": format!("channel-{id}"),
                "position": 0,
                "permission_overwrites": [],
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": guild_id.to_string(),
        "name": "Test Guild",
        "icon": null,
        "owner_id": owner_id.to_string(),
        "afk_timeout": 300,
        "verification_level": 0,
        "default_message_notifications": 0,
        "explicit_content_filter": 0,
        "roles": roles,
        "emojis": [],
        "stickers": [],
        "features": [],
        "mfa_level": 0,
        "system_channel_flags": 0,
        "premium_tier": 0,
        "premium_subscription_count": 0,
        "premium_progress_bar_enabled": false,
        "preferred_locale": "en-US",
        "nsfw_level": 0,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "large": false,
        "member_count": 100,
        "voice_states": [],
        "channels": channels,
        "threads": [],
        "presences": [],
        "max_presences": 25000,
        "max_members": 100000,
        "unavailable": false,
        "members": [],
        "stage_instances": [],
        "guild_scheduled_events": [],
    }))
    .expect("Failed to create test guild - invalid JSON structure")
}

fn role_json(role_id: u64, permissions: Permissions) -> Value {
    json!({
        "id": role_id.to_string(),
        "name": format!("role-{role_id}"),
        "color": 0,
        "colors": {
            "primary_color": 0,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": 0,
        "permissions": permissions.bits().to_string(),
        "managed": false,
        "mentionable": false,
    })
}
