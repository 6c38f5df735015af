use serde_json::json;
use serenity::all::Reaction;

use super::member::member_json;

/// Creates a test Serenity Reaction added in a guild, carrying the reacting member.
///
/// # Arguments
/// - `guild_id` - Guild the reaction was added in
/// - `channel_id` - Channel of the reacted message
/// - `user_id` - User who reacted
/// - `bot` - Whether the user is a bot account
/// - `roles` - Role IDs of the reacting member
/// - `emoji` - Unicode emoji
///
/// # Panics
/// - If the JSON cannot be deserialized into a Reaction (indicates invalid test data)
pub fn create_test_reaction(
    guild_id: u64,
    channel_id: u64,
    user_id: u64,
    bot: bool,
    roles: &[u64],
    emoji: &str,
) -> Reaction {
    serde_json::from_value(json!({
        "user_id": user_id.to_string(),
        "channel_id": channel_id.to_string(),
        "message_id": "1",
        "guild_id": guild_id.to_string(),
        "member": member_json(guild_id, user_id, bot, roles),
        "emoji": { "id": null, "name": emoji },
        "burst": false,
        "burst_colors": [],
        "type": 0,
    }))
    .expect("Failed to create test reaction - invalid JSON structure")
}
