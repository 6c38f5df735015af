//! Export of channel history to the chat log viewer.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use serenity::all::{Cache, Message, User, UserId};

use crate::error::AppError;

/// Where a set of logged messages was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSource {
    pub channel_name: Option<String>,
    pub category_name: Option<String>,
    pub guild_name: Option<String>,
    pub guild_icon_url: Option<String>,
}

impl LogSource {
    /// Looks up channel, category and guild names for a message from the cache.
    pub fn from_cache(cache: &Cache, message: &Message) -> Self {
        let Some(guild) = message.guild_id.and_then(|id| cache.guild(id)) else {
            return Self::default();
        };

        let channel = guild.channels.get(&message.channel_id);
        let category_name = channel
            .and_then(|channel| channel.parent_id)
            .and_then(|parent| guild.channels.get(&parent))
            .map(|category| category.name.clone());

        Self {
            channel_name: channel.map(|channel| channel.name.clone()),
            category_name,
            guild_name: Some(guild.name.clone()),
            guild_icon_url: guild.icon_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogUser {
    pub username: String,
    pub discriminator: String,
    pub avatar_url: String,
    pub bot: bool,
    pub display_name: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMessage {
    pub id: u64,
    pub content: String,
    pub author_id: u64,
    pub timestamp: i64,
    pub attachments: Vec<String>,
    pub embeds: Vec<Value>,
}

/// Payload accepted by the chat log endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageLog {
    #[serde(flatten)]
    pub source: LogSource,
    /// Every author and mentioned user, keyed by user ID.
    pub users: BTreeMap<String, LogUser>,
    /// Messages oldest first.
    pub messages: Vec<LogMessage>,
}

impl MessageLog {
    /// Builds a log from messages ordered newest first, as channel history is returned.
    ///
    /// # Arguments
    /// - `messages` - Messages, newest first
    /// - `source` - Channel and guild the messages came from
    /// - `colour_of` - Display colour for a user, `0` for none
    pub fn from_messages(
        messages: &[Message],
        source: LogSource,
        colour_of: impl Fn(UserId) -> u32,
    ) -> Self {
        let mut users = BTreeMap::new();

        for message in messages {
            for user in message.mentions.iter().chain(std::iter::once(&message.author)) {
                users.insert(user.id.to_string(), log_user(user, colour_of(user.id)));
            }
        }

        let messages = messages.iter().rev().map(log_message).collect();

        Self {
            source,
            users,
            messages,
        }
    }

    /// Builds a log using the cache for names and member colours.
    pub fn from_cache(cache: &Cache, messages: &[Message]) -> Self {
        let source = messages
            .first()
            .map(|message| LogSource::from_cache(cache, message))
            .unwrap_or_default();
        let guild_id = messages.first().and_then(|message| message.guild_id);

        Self::from_messages(messages, source, |user_id| {
            guild_id
                .and_then(|guild_id| cache.member(guild_id, user_id))
                .and_then(|member| member.colour(cache))
                .map(|colour| colour.0)
                .unwrap_or(0)
        })
    }
}

fn log_user(user: &User, color: u32) -> LogUser {
    LogUser {
        username: user.name.clone(),
        discriminator: user
            .discriminator
            .map(|d| format!("{:04}", d.get()))
            .unwrap_or_else(|| "0".to_string()),
        avatar_url: user.face(),
        bot: user.bot,
        display_name: user.display_name().to_string(),
        color,
    }
}

fn log_message(message: &Message) -> LogMessage {
    let embeds = message
        .embeds
        .iter()
        .filter_map(|embed| {
            let mut value = serde_json::to_value(embed).ok()?;
            if let (Some(object), Some(timestamp)) = (value.as_object_mut(), embed.timestamp) {
                object.insert("timestamp".to_string(), timestamp.unix_timestamp().into());
            }
            Some(value)
        })
        .collect();

    LogMessage {
        id: message.id.get(),
        content: message.content.clone(),
        author_id: message.author.id.get(),
        timestamp: message.timestamp.unix_timestamp(),
        attachments: message
            .attachments
            .iter()
            .map(|attachment| attachment.url.clone())
            .collect(),
        embeds,
    }
}

/// Posts a message log to the chat log endpoint.
///
/// # Returns
/// - `Ok(String)` - Response body, the rendered log
/// - `Err(AppError::ReqwestErr)` - Request failed or returned an error status
pub async fn export_message_log(
    http_client: &reqwest::Client,
    url: &str,
    log: &MessageLog,
) -> Result<String, AppError> {
    tracing::debug!("Exporting {} messages to {}", log.messages.len(), url);

    let body = http_client
        .post(url)
        .json(log)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(body)
}
