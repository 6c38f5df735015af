use serde_json::{json, Value};
use serenity::all::{Message, User};

/// Creates a test Serenity Message with no attachments, embeds or mentions.
///
/// # Arguments
/// - `message_id` - Message ID, also used to derive a distinct timestamp
/// - `channel_id` - Channel the message was sent in
/// - `guild_id` - Guild the message was sent in, `None` for a direct message
/// - `author` - Message author
/// - `content` - Message text
///
/// # Panics
/// - If the JSON cannot be deserialized into a Message (indicates invalid test data)
pub fn create_test_message(
    message_id: u64,
    channel_id: u64,
    guild_id: Option<u64>,
    author: &User,
    content: &str,
) -> Message {
    create_test_message_from_json(message_id, channel_id, guild_id, author, content, json!({}))
}

/// Creates a test Serenity Message, merging `extra` over the default fields.
///
/// Use this for attachments, embeds and mentions, e.g.
/// `json!({ "attachments": [...] })`.
pub fn create_test_message_from_json(
    message_id: u64,
    channel_id: u64,
    guild_id: Option<u64>,
    author: &User,
    content: &str,
    extra: Value,
) -> Message {
    let mut message = json!({
        "id": message_id.to_string(),
        "channel_id": channel_id.to_string(),
        "guild_id": guild_id.map(|id| id.to_string()),
        "author": serde_json::to_value(author).expect("Failed to serialize test user"),
        "content": content,
        "timestamp": format!("2024-01-01T00:{:02}:00.000000+00:00", message_id % 60),
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "attachments": [],
        "embeds": [],
        "pinned": false,
        "type": 0,
    });

    if let (Some(message), Some(extra)) = (message.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            message.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(message).expect("Failed to create test message - invalid JSON structure")
}
