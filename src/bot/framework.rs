//! Command framework setup.
//!
//! Prefix parsing, command lookup and argument handling are done by poise. This module
//! wires the bot's own pieces into it: per-guild prefixes through
//! [`Prefixes`](crate::bot::prefix::Prefixes), command metrics and pageviews before every
//! command, and reporting of command errors to the bot owners.

use std::{future::Future, pin::Pin};

use serenity::all::{Context as SerenityContext, CreateMessage, GuildId, Message};

use crate::{error::AppError, service::google_analytics::Pageview, state::BotState};

pub type Context<'a> = poise::Context<'a, BotState, AppError>;
pub type Command = poise::Command<BotState, AppError>;
pub type FrameworkError<'a> = poise::FrameworkError<'a, BotState, AppError>;

type PrefixFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<(&'a str, &'a str)>, AppError>> + Send + 'a>>;

/// Stats tag for a command name. Spaces in qualified names become `:`.
pub fn command_stats_name(command: &str) -> String {
    command.replace(' ', ":")
}

/// Splits `content` into the guild's prefix and the rest of the message.
pub fn message_prefix<'c>(
    state: &BotState,
    guild_id: Option<GuildId>,
    content: &'c str,
) -> Option<(&'c str, &'c str)> {
    state.prefixes(guild_id).strip_prefix(content)
}

fn stripped_prefix<'a>(
    _ctx: &'a SerenityContext,
    message: &'a Message,
    state: &'a BotState,
) -> PrefixFuture<'a> {
    Box::pin(async move { Ok(message_prefix(state, message.guild_id, &message.content)) })
}

/// Prefix handling: per-guild prefixes, mentions of the bot, and command names in any case.
pub fn prefix_options() -> poise::PrefixFrameworkOptions<BotState, AppError> {
    poise::PrefixFrameworkOptions {
        prefix: None,
        stripped_dynamic_prefix: Some(stripped_prefix),
        mention_as_prefix: true,
        case_insensitive_commands: true,
        ignore_bots: true,
        ..Default::default()
    }
}

/// Builds the framework with every command from the state's extensions.
pub fn build_framework(state: BotState) -> poise::Framework<BotState, AppError> {
    let options = poise::FrameworkOptions {
        commands: state.extensions.commands(),
        prefix_options: prefix_options(),
        pre_command: |ctx| Box::pin(pre_command(ctx)),
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    };

    poise::Framework::builder()
        .options(options)
        .setup(move |_ctx, _ready, _framework| Box::pin(async move { Ok(state) }))
        .build()
}

async fn pre_command(ctx: Context<'_>) {
    let state = ctx.data();
    let command = &ctx.command().qualified_name;

    tracing::debug!("Running command {} for {}", command, ctx.author().id);

    let stats_name = command_stats_name(command);
    state
        .stats
        .emit("discord.bot.commands", &[("command_name", stats_name.as_str())]);
    state
        .google_analytics
        .spawn(Pageview::command(command, ctx.author().id, ctx.guild_id()));
}

async fn on_error(error: FrameworkError<'_>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let command = &ctx.command().qualified_name;
            tracing::error!("Command {} failed: {}", command, error);

            if ctx.data().config().dm_uncaught_errors {
                report_error(ctx, &error).await;
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Sends a command error to every owner. Owners with closed DMs are skipped.
async fn report_error(ctx: Context<'_>, error: &AppError) {
    let content = format!(
        "Error running `{}` for {} in channel {}: {}",
        ctx.command().qualified_name,
        ctx.author().id,
        ctx.channel_id(),
        error
    );

    for owner in ctx.data().owner_ids() {
        if let Err(e) = owner
            .direct_message(ctx.serenity_context(), CreateMessage::new().content(&content))
            .await
        {
            tracing::debug!("Couldn't DM owner {}: {}", owner, e);
        }
    }
}
