use serde_json::{json, Value};
use serenity::all::Member;

use super::user::user_json;

/// Creates a test Serenity Member.
///
/// # Arguments
/// - `guild_id` - Guild the member belongs to
/// - `user_id` - Member's user ID
/// - `bot` - Whether the user is a bot account
/// - `roles` - Role IDs the member has, excluding `@everyone`
///
/// # Panics
/// - If the JSON cannot be deserialized into a Member (indicates invalid test data)
pub fn create_test_member(guild_id: u64, user_id: u64, bot: bool, roles: &[u64]) -> Member {
    serde_json::from_value(member_json(guild_id, user_id, bot, roles))
        .expect("Failed to create test member - invalid JSON structure")
}

pub(crate) fn member_json(guild_id: u64, user_id: u64, bot: bool, roles: &[u64]) -> Value {
    let roles: Vec<String> = roles.iter().map(u64::to_string).collect();

    json!({
        "guild_id": guild_id.to_string(),
        "user": user_json(user_id, &format!("user{user_id}"), bot),
        "nick": null,
        "roles": roles,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "deaf": false,
        "mute": false,
        "flags": 0,
    })
}
