//! Periodic guild count reporting.
//!
//! Once every local shard is ready, the guild count is sent to statsd every minute and to
//! the bot listing sites every five minutes. Only the instance running shard 0 reports, so
//! a bot split over several processes is counted once.

use std::sync::Arc;

use serde_json::{json, Value};
use serenity::all::{Cache, UserId};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{config::cli::ShardRange, error::AppError, state::BotState};

const TOPGG_URL: &str = "https://top.gg/api/bots";
const DISCORDBOTLIST_URL: &str = "https://discordbotlist.com/api/v1/bots";

/// Estimates the bot's total guild count from the guilds seen by this instance.
///
/// Guilds are spread evenly across shards, so the local count is scaled from the shards
/// this instance runs up to the total shard count.
pub fn effective_guild_count(local_guilds: usize, shards: &ShardRange) -> u64 {
    let per_shard = local_guilds as f64 / shards.local_count() as f64;
    (per_shard * shards.total as f64) as u64
}

pub fn topgg_payload(guild_count: u64, shard_count: u32) -> Value {
    json!({
        "server_count": guild_count,
        "shard_count": shard_count,
        "shard_id": 0,
    })
}

pub fn discordbotlist_payload(guild_count: u64) -> Value {
    json!({ "guilds": guild_count })
}

/// Starts the reporting jobs.
///
/// Returns immediately on instances that don't run shard 0. Otherwise waits until every
/// local shard is ready before scheduling anything.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `cache` - Gateway cache used to count guilds
pub async fn start_scheduler(state: BotState, cache: Arc<Cache>) -> Result<(), AppError> {
    if !state.shards.owns_shard_zero() {
        tracing::info!("Not running shard 0, skipping guild count reporting");
        return Ok(());
    }

    state.ready.wait().await;

    let scheduler = JobScheduler::new().await?;

    let stats_state = state.clone();
    let stats_cache = cache.clone();
    let stats_job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let state = stats_state.clone();
        let cache = stats_cache.clone();

        Box::pin(async move {
            let count = effective_guild_count(cache.guild_count(), &state.shards);
            state
                .stats
                .gauge("discord.stats.guild_count", count as f64, &[])
                .await;
        })
    })?;

    let listing_state = state.clone();
    let listing_cache = cache.clone();
    let listing_job = Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
        let state = listing_state.clone();
        let cache = listing_cache.clone();

        Box::pin(async move {
            let count = effective_guild_count(cache.guild_count(), &state.shards);
            let bot_id = cache.current_user().id;
            post_listing_counts(&state, bot_id, count).await;
        })
    })?;

    scheduler.add(stats_job).await?;
    scheduler.add(listing_job).await?;
    scheduler.start().await?;

    tracing::info!("Guild count scheduler started");

    Ok(())
}

async fn post_listing_counts(state: &BotState, bot_id: UserId, guild_count: u64) {
    let config = state.config();
    let keys = &config.bot_listing_api_keys;

    if keys.topgg_token.is_empty() {
        tracing::warn!("No Top.gg token has been provided");
    } else {
        let url = format!("{TOPGG_URL}/{bot_id}/stats");
        let payload = topgg_payload(guild_count, state.shards.total);
        if let Err(e) = post_count(state, &url, &keys.topgg_token, &payload).await {
            tracing::error!("Failed to post guild count to Top.gg: {}", e);
        }
    }

    if keys.discordbotlist_token.is_empty() {
        tracing::warn!("No DiscordBotList.com token has been provided");
    } else {
        let url = format!("{DISCORDBOTLIST_URL}/{bot_id}/stats");
        let payload = discordbotlist_payload(guild_count);
        if let Err(e) = post_count(state, &url, &keys.discordbotlist_token, &payload).await {
            tracing::error!("Failed to post guild count to DiscordBotList.com: {}", e);
        }
    }
}

async fn post_count(
    state: &BotState,
    url: &str,
    token: &str,
    payload: &Value,
) -> Result<(), AppError> {
    tracing::info!("Sending POST request to {} with data {}", url, payload);

    state
        .http_client
        .post(url)
        .header(reqwest::header::AUTHORIZATION, token)
        .json(payload)
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}
