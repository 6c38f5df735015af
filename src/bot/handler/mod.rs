use serenity::{
    all::{Context, EventHandler, Guild, Ready, UnavailableGuild},
    async_trait,
};

use crate::state::BotState;

pub mod guild;
pub mod ready;

/// Discord bot event handler. Commands are dispatched by the framework, not here.
pub struct Handler {
    pub state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when a shard is connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.state, ctx, ready).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        guild::handle_guild_create(&self.state, ctx, guild, is_new).await;
    }

    /// Called when the bot is removed from a guild or the guild becomes unavailable
    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        guild::handle_guild_delete(&self.state, ctx, incomplete, full).await;
    }
}
