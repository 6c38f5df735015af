//! Commands every bot built on this crate ships with.

use serenity::async_trait;

use crate::{
    bot::{
        delete_button::{spawn_delete_button, DEFAULT_TIMEOUT},
        framework::{Command, Context},
        invite::InviteOptions,
    },
    error::AppError,
    extension::Extension,
    util::time_value::TimeValue,
};

/// `invite`, `uptime` and the owner-only `reloadconfig`.
pub struct CoreExtension;

/// Reply text for the `uptime` command.
pub fn uptime_text(seconds: u64) -> String {
    match TimeValue::from_secs(seconds) {
        Ok(uptime) if seconds > 0 => {
            format!("The bot has been online for {}.", uptime.clean_full())
        }
        Ok(_) => "The bot has just started.".to_string(),
        Err(_) => format!("The bot has been online for {} seconds.", seconds),
    }
}

#[async_trait]
impl Extension for CoreExtension {
    fn name(&self) -> &str {
        "core"
    }

    fn commands(&self) -> Vec<Command> {
        vec![invite(), uptime(), reload_config()]
    }
}

/// Sends the bot's invite link.
#[poise::command(prefix_command)]
pub async fn invite(ctx: Context<'_>) -> Result<(), AppError> {
    let bot_id = ctx.serenity_context().cache.current_user().id;
    let link = ctx.data().invite_link(bot_id, &InviteOptions::default());

    reply(ctx, format!("<{}>", link)).await
}

/// Shows how long the bot has been running.
#[poise::command(prefix_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), AppError> {
    reply(ctx, uptime_text(ctx.data().uptime().as_secs())).await
}

/// Reloads the configuration file. A config that no longer parses ends the process.
#[poise::command(prefix_command, rename = "reloadconfig", check = "is_owner", hide_in_help)]
pub async fn reload_config(ctx: Context<'_>) -> Result<(), AppError> {
    ctx.data().config.reload_or_exit();

    reply(ctx, "Reloaded config.".to_string()).await
}

/// Owners are read from the live config so a reload takes effect immediately.
async fn is_owner(ctx: Context<'_>) -> Result<bool, AppError> {
    Ok(ctx.data().is_owner(ctx.author().id))
}

/// Replies in the invoking channel with a delete button for the reply and the trigger.
async fn reply(ctx: Context<'_>, content: String) -> Result<(), AppError> {
    let reply = ctx.say(content).await?.into_message().await?;

    if let poise::Context::Prefix(prefix) = ctx {
        let trigger = prefix.msg;
        let delete = vec![reply.id, trigger.id];
        spawn_delete_button(
            ctx.serenity_context(),
            reply,
            vec![trigger.author.id],
            delete,
            DEFAULT_TIMEOUT,
        );
    }

    Ok(())
}
