use serenity::all::User;

/// Creates a test Serenity User.
///
/// # Arguments
/// - `user_id` - Discord user ID
/// - `username` - Username, also used as the global display name
/// - `bot` - Whether the user is a bot account
///
/// # Panics
/// - If the JSON cannot be deserialized into a User (indicates invalid test data)
pub fn create_test_user(user_id: u64, username: &str, bot: bool) -> User {
    serde_json::from_value(user_json(user_id, username, bot))
        .expect("Failed to create test user - invalid JSON structure")
}

pub(crate) fn user_json(user_id: u64, username: &str, bot: bool) -> serde_json::Value {
    serde_json::json!({
        "id": user_id.to_string(),
        "username": username,
        "discriminator": "0",
        "global_name": username,
        "avatar": null,
        "bot": bot,
    })
}
