use serenity::all::{Context, Guild, UnavailableGuild};

use crate::{service::google_analytics::Pageview, state::BotState};

/// Counts a guild join. Guilds becoming available on startup are not joins.
pub async fn handle_guild_create(
    state: &BotState,
    _ctx: Context,
    guild: Guild,
    is_new: Option<bool>,
) {
    if is_new != Some(true) {
        return;
    }

    tracing::info!("Added to guild {} ({})", guild.name, guild.id);
    state.stats.emit("discord.bot.guild_join", &[]);
    state.google_analytics.spawn(Pageview::guild_add(guild.id));
}

/// Counts a guild removal. Guilds going unavailable during an outage are not removals.
pub async fn handle_guild_delete(
    state: &BotState,
    _ctx: Context,
    incomplete: UnavailableGuild,
    _full: Option<Guild>,
) {
    if incomplete.unavailable {
        tracing::debug!("Guild {} became unavailable", incomplete.id);
        return;
    }

    tracing::info!("Removed from guild {}", incomplete.id);
    state.stats.emit("discord.bot.guild_remove", &[]);
    state
        .google_analytics
        .spawn(Pageview::guild_remove(incomplete.id));
}
