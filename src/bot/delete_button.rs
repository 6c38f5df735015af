//! Wastebasket reaction that lets the requester delete a bot reply.

use std::{sync::Arc, time::Duration};

use serenity::all::{
    Cache, ChannelId, Context, Guild, GuildId, Member, Message, MessageId, Permissions, Reaction,
    ReactionType, UserId,
};

pub const WASTEBASKET: &str = "\u{1F5D1}";

/// How long a delete button stays active by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const VARIATION_SELECTOR: char = '\u{FE0F}';

pub fn is_wastebasket(emoji: &ReactionType) -> bool {
    match emoji {
        ReactionType::Unicode(value) => value.trim_end_matches(VARIATION_SELECTOR) == WASTEBASKET,
        _ => false,
    }
}

/// Whether a user may press the delete button.
///
/// Bots never can. Humans can when they are listed in `valid_users` or can manage messages
/// in the channel.
pub fn can_press(
    user_id: UserId,
    is_bot: bool,
    valid_users: &[UserId],
    can_manage_messages: bool,
) -> bool {
    !is_bot && (valid_users.contains(&user_id) || can_manage_messages)
}

/// Permissions `member` has in one of `guild`'s channels.
///
/// Empty when the channel isn't part of the guild.
pub fn member_permissions(guild: &Guild, channel_id: ChannelId, member: &Member) -> Permissions {
    guild
        .channels
        .get(&channel_id)
        .map(|channel| guild.user_permissions_in(channel, member))
        .unwrap_or_else(Permissions::empty)
}

/// Permissions of a cached member. Empty when the guild or member isn't cached.
fn cached_permissions(
    cache: &Cache,
    guild_id: GuildId,
    channel_id: ChannelId,
    user_id: UserId,
) -> Permissions {
    let Some(guild) = cache.guild(guild_id) else {
        return Permissions::empty();
    };
    let permissions = match guild.members.get(&user_id) {
        Some(member) => member_permissions(&guild, channel_id, member),
        None => Permissions::empty(),
    };
    permissions
}

/// Whether `reaction` presses a delete button in `guild`.
///
/// The reacting member comes from the reaction itself, falling back to the guild's member
/// cache, so large guilds without a full member list still work.
pub fn press_allowed(guild: Option<&Guild>, reaction: &Reaction, valid_users: &[UserId]) -> bool {
    if !is_wastebasket(&reaction.emoji) || reaction.guild_id.is_none() {
        return false;
    }
    let Some(user_id) = reaction.user_id else {
        return false;
    };

    let member = reaction
        .member
        .as_ref()
        .or_else(|| guild.and_then(|guild| guild.members.get(&user_id)));
    let is_bot = member.map(|member| member.user.bot).unwrap_or(true);

    let can_manage = match (guild, member) {
        (Some(guild), Some(member)) => {
            member_permissions(guild, reaction.channel_id, member).manage_messages()
        }
        _ => false,
    };

    can_press(user_id, is_bot, valid_users, can_manage)
}

fn reaction_allowed(cache: &Cache, reaction: &Reaction, valid_users: &[UserId]) -> bool {
    let guild = reaction.guild_id.and_then(|id| cache.guild(id));
    press_allowed(guild.as_deref(), reaction, valid_users)
}

/// Adds a delete button to `message` and waits for it to be pressed.
///
/// Does nothing in direct messages. When an allowed user reacts with the wastebasket, the
/// messages in `delete` are removed (just `message` when empty). When nobody does within
/// `timeout`, the bot's own reaction is removed instead. Failures are logged and ignored.
///
/// # Arguments
/// - `ctx` - Context of the shard the message was sent on
/// - `message` - Message to attach the button to
/// - `valid_users` - Users allowed to press the button besides message managers
/// - `delete` - Messages in the same channel to delete when pressed
/// - `timeout` - How long to wait for a press
pub async fn add_delete_button(
    ctx: &Context,
    message: &Message,
    valid_users: Vec<UserId>,
    delete: Vec<MessageId>,
    timeout: Duration,
) {
    let Some(guild_id) = message.guild_id else {
        return;
    };

    if let Err(e) = message
        .react(&ctx.http, ReactionType::Unicode(WASTEBASKET.to_string()))
        .await
    {
        tracing::debug!("Couldn't add delete button to {}: {}", message.id, e);
        return;
    }

    let cache = Arc::clone(&ctx.cache);
    let pressed = message
        .await_reaction(&ctx.shard)
        .timeout(timeout)
        .filter(move |reaction| reaction_allowed(&cache, reaction, &valid_users))
        .await;

    if pressed.is_none() {
        if let Err(e) = message
            .delete_reaction(&ctx.http, None, ReactionType::Unicode(WASTEBASKET.to_string()))
            .await
        {
            tracing::debug!("Couldn't remove delete button from {}: {}", message.id, e);
        }
        return;
    }

    let delete = if delete.is_empty() {
        vec![message.id]
    } else {
        delete
    };

    let bot_id = ctx.cache.current_user().id;
    let bot_permissions = cached_permissions(&ctx.cache, guild_id, message.channel_id, bot_id);
    let bulk = delete.len() > 1
        && bot_permissions.manage_messages()
        && bot_permissions.read_message_history();

    let result = if bulk {
        message.channel_id.delete_messages(&ctx.http, &delete).await
    } else {
        let mut result = Ok(());
        for id in &delete {
            if let Err(e) = message.channel_id.delete_message(&ctx.http, *id).await {
                result = Err(e);
            }
        }
        result
    };

    if let Err(e) = result {
        tracing::debug!("Couldn't delete messages for delete button: {}", e);
    }
}

/// Runs [`add_delete_button`] in a background task.
pub fn spawn_delete_button(
    ctx: &Context,
    message: Message,
    valid_users: Vec<UserId>,
    delete: Vec<MessageId>,
    timeout: Duration,
) {
    let ctx = ctx.clone();

    tokio::spawn(async move {
        add_delete_button(&ctx, &message, valid_users, delete, timeout).await;
    });
}
