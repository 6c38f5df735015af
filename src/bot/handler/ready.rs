//! Ready event handler.
//!
//! Fires once per shard after the gateway handshake. Each shard sets its presence from
//! the configuration, and the shard that completes the set of local shards releases
//! everything waiting on [`ReadySignal`](crate::bot::readiness::ReadySignal).

use serenity::all::{Context, ExecuteWebhook, Opcode, Ready};

use crate::{
    bot::{gateway::record_send, presence::set_default_presence},
    state::BotState,
};

/// Handles the ready event for one shard.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Context of the shard that became ready
/// - `ready` - Ready payload with the bot user and shard info
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    let shard_id = ready.shard.map(|shard| shard.id.0).unwrap_or(0);

    tracing::info!(
        "Bot connected - {} // {} (shard {})",
        ready.user.name,
        ready.user.id,
        shard_id
    );

    set_default_presence(&ctx, &state.config().presence, ready.shard);
    record_send(&state.stats, Opcode::PresenceUpdate);

    if state.ready.mark_ready(shard_id) {
        tracing::info!("Bot loaded.");
        announce_ready(state, &ctx, &ready).await;
    }
}

/// Posts to the event webhook, if one is configured, once every local shard is ready.
async fn announce_ready(state: &BotState, ctx: &Context, ready: &Ready) {
    let webhook = match state.event_webhook(&ctx.http).await {
        Ok(Some(webhook)) => webhook,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!("Couldn't fetch event webhook: {}", e);
            return;
        }
    };

    let content = format!(
        "{} is ready with shards {}..={} of {}.",
        ready.user.name, state.shards.min, state.shards.max, state.shards.total
    );

    if let Err(e) = webhook
        .execute(ctx, false, ExecuteWebhook::new().content(content))
        .await
    {
        tracing::warn!("Couldn't post to event webhook: {}", e);
    }
}
