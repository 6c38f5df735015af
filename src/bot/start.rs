use std::sync::Arc;

use serenity::all::{Cache, Client};

use crate::{
    bot::{
        framework::build_framework, gateway::GatewayStats, handler::Handler,
        presence::reconnecting_presence,
    },
    config::{cli::ShardRange, ConfigHandle},
    error::{fatal, supervise, AppError},
    extension::ExtensionRegistry,
    scheduler::analytics,
    service::hydration::run_startup,
    startup,
    state::BotState,
};

/// Builds the Discord client with the configured intents, the command framework, the
/// bot's event handler and the gateway counters.
///
/// Shards identify as "Reconnecting..." on do not disturb until their ready handler sets
/// the configured presence.
///
/// # Arguments
/// - `state` - Shared state handed to the framework and event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to connect
/// - `Err(AppError::DiscordErr)` - The client could not be built, e.g. an invalid token
pub async fn init_bot(state: BotState) -> Result<Client, AppError> {
    let config = state.config();
    let intents = config.gateway_intents();

    let (activity, status) = reconnecting_presence();

    let client = Client::builder(&config.token, intents)
        .framework(build_framework(state.clone()))
        .raw_event_handler(GatewayStats::new(state.stats.clone()))
        .event_handler(Handler::new(state))
        .activity(activity)
        .status(status)
        .await?;

    Ok(client)
}

/// Connects the shards this instance runs. Blocks until the client shuts down.
pub async fn start_bot(mut client: Client, shards: ShardRange) -> Result<(), AppError> {
    if shards.total == 1 {
        tracing::info!("Starting Discord bot");
        client.start().await?;
    } else if shards.is_complete() {
        tracing::info!("Starting Discord bot with {} shards", shards.total);
        client.start_shards(shards.total).await?;
    } else {
        tracing::info!(
            "Starting Discord bot with shards {}..={} of {}",
            shards.min,
            shards.max,
            shards.total
        );
        client
            .start_shard_range(shards.min..shards.max + 1, shards.total)
            .await?;
    }

    Ok(())
}

/// Runs the bot until the client shuts down.
///
/// Opens the database and redis connections that are enabled, starts settings hydration
/// and the analytics scheduler in the background, then connects to the gateway.
/// Hydration failures are fatal; every other error is returned.
pub async fn run(
    config: ConfigHandle,
    shards: ShardRange,
    extensions: ExtensionRegistry,
) -> Result<(), AppError> {
    let snapshot = config.get();

    let db = startup::connect_to_database(&snapshot).await?;
    let redis = startup::connect_to_redis(&snapshot).await?;

    let mut state = BotState::new(config, shards, extensions);
    if let Some(db) = db.clone() {
        state = state.with_database(db);
    }
    if let Some(redis) = redis {
        state = state.with_redis(redis);
    }

    match db {
        Some(db) => {
            let startup_state = state.clone();
            tokio::spawn(async move {
                let startup = run_startup(
                    db,
                    &startup_state.settings,
                    &startup_state.extensions,
                    &startup_state.ready,
                );
                supervise(startup, |e| fatal(e)).await;
            });
        }
        None => tracing::info!("Database disabled, settings will use built-in defaults"),
    }

    let client = init_bot(state.clone()).await?;

    spawn_scheduler(state, client.cache.clone());

    start_bot(client, shards).await
}

fn spawn_scheduler(state: BotState, cache: Arc<Cache>) {
    tokio::spawn(async move {
        if let Err(e) = analytics::start_scheduler(state, cache).await {
            tracing::error!("Analytics scheduler error: {}", e);
        }
    });
}
