use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use sea_orm::DatabaseConnection;
use serenity::all::{CacheHttp, Context, GuildId, Http, Message, PartialGuild, UserId, Webhook};

use crate::{
    bot::{
        invite::{invite_link, InviteOptions},
        message_log::{export_message_log, MessageLog},
        prefix::Prefixes,
        readiness::ReadySignal,
    },
    cache::SettingsStore,
    config::{cli::ShardRange, Config, ConfigHandle},
    data::redis::RedisConnection,
    error::AppError,
    extension::ExtensionRegistry,
    service::{google_analytics::GoogleAnalytics, stats::StatsClient},
};

/// Shared state handed to the event handler, extensions and background tasks.
///
/// Cloning is cheap; every field is a handle to shared data.
#[derive(Clone)]
pub struct BotState {
    pub config: ConfigHandle,
    /// Connection pool, present when `database.enabled` is set.
    pub db: Option<DatabaseConnection>,
    /// Present when `redis.enabled` is set.
    pub redis: Option<RedisConnection>,
    pub settings: Arc<SettingsStore>,
    pub stats: StatsClient,
    pub google_analytics: GoogleAnalytics,
    pub http_client: reqwest::Client,
    pub ready: ReadySignal,
    pub extensions: ExtensionRegistry,
    pub shards: ShardRange,
    started_at: Instant,
}

impl BotState {
    /// Creates state with no database or redis connection.
    ///
    /// Connections are attached with [`BotState::with_database`] and
    /// [`BotState::with_redis`] once they are open.
    pub fn new(config: ConfigHandle, shards: ShardRange, extensions: ExtensionRegistry) -> Self {
        let snapshot = config.get();
        let http_client = reqwest::Client::new();

        Self {
            settings: Arc::new(SettingsStore::new(&snapshot.default_prefix)),
            stats: StatsClient::new(&snapshot.statsd),
            google_analytics: GoogleAnalytics::new(
                &snapshot.google_analytics,
                http_client.clone(),
            ),
            http_client,
            ready: ReadySignal::new(shards.local_count()),
            db: None,
            redis: None,
            config,
            extensions,
            shards,
            started_at: Instant::now(),
        }
    }

    pub fn with_database(mut self, db: DatabaseConnection) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_redis(mut self, redis: RedisConnection) -> Self {
        self.redis = Some(redis);
        self
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<Config> {
        self.config.get()
    }

    /// Time since the state was created, which is close to process start.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn owner_ids(&self) -> Vec<UserId> {
        self.config().owners.iter().map(|id| UserId::new(*id)).collect()
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.config().is_owner(user_id.get())
    }

    /// Prefixes accepted for a message in `guild_id`, or in direct messages when `None`.
    ///
    /// Mentions of the bot are accepted by the command framework on top of these.
    pub fn prefixes(&self, guild_id: Option<GuildId>) -> Prefixes {
        let prefix = guild_id
            .and_then(|id| self.settings.guild_prefix(id.get()))
            .unwrap_or_else(|| self.config().default_prefix.clone());

        Prefixes::new(&prefix)
    }

    /// Invite link for the bot.
    ///
    /// Uses `oauth.client_id` when it is set, otherwise the bot's own user ID.
    pub fn invite_link(&self, bot_id: UserId, options: &InviteOptions) -> String {
        let config = self.config();
        let client_id = match config.oauth.client_id.trim() {
            "" => bot_id.to_string(),
            id => id.to_string(),
        };

        invite_link(&client_id, options)
    }

    /// The configured event webhook.
    ///
    /// # Returns
    /// - `Ok(Some(Webhook))` - Webhook fetched from `event_webhook_url`
    /// - `Ok(None)` - No webhook configured
    /// - `Err(AppError::DiscordErr)` - URL invalid or webhook not found
    pub async fn event_webhook(&self, http: &Http) -> Result<Option<Webhook>, AppError> {
        let config = self.config();
        let Some(url) = config.event_webhook_url() else {
            return Ok(None);
        };

        Ok(Some(Webhook::from_url(http, url).await?))
    }

    /// Fetches the guild set as `support_guild_id`, preferring the cache.
    pub async fn fetch_support_guild(
        &self,
        cache_http: impl CacheHttp,
    ) -> Result<Option<PartialGuild>, AppError> {
        let guild_id = self.config().support_guild_id;
        if guild_id == 0 {
            return Ok(None);
        }

        Ok(Some(GuildId::new(guild_id).to_partial_guild(cache_http).await?))
    }

    /// Builds a log from `messages` (newest first) and uploads it to `chatlog_url`.
    pub async fn create_message_log(
        &self,
        ctx: &Context,
        messages: &[Message],
    ) -> Result<String, AppError> {
        let log = MessageLog::from_cache(&ctx.cache, messages);
        let url = self.config().chatlog_url.clone();

        export_message_log(&self.http_client, &url, &log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::SettingsKind;
    use serde_json::json;
    use std::path::Path;

    fn state(toml: &str) -> BotState {
        let config = Config::from_toml_str(Path::new("config.toml"), toml).unwrap();
        BotState::new(
            ConfigHandle::from_config("config.toml", config),
            ShardRange::single(),
            ExtensionRegistry::new(),
        )
    }

    #[test]
    fn guild_prefix_overrides_default() {
        let state = state(r#"token = "t""#);
        state.settings.update(SettingsKind::Guild, 42, |settings| {
            settings.insert("prefix".to_string(), json!("?"));
        });

        let guild = state.prefixes(Some(GuildId::new(42)));
        let other = state.prefixes(Some(GuildId::new(43)));
        let dm = state.prefixes(None);

        assert_eq!(guild.strip_prefix("?ping"), Some(("?", "ping")));
        assert_eq!(guild.strip_prefix("!ping"), None);
        assert_eq!(other.strip_prefix("!ping"), Some(("!", "ping")));
        assert_eq!(dm.strip_prefix("!ping"), Some(("!", "ping")));
    }

    #[test]
    fn null_guild_prefix_uses_default() {
        let state = state(
            r#"
token = "t"
default_prefix = "$"
"#,
        );
        state.settings.update(SettingsKind::Guild, 42, |settings| {
            settings.insert("prefix".to_string(), json!(null));
        });

        let prefixes = state.prefixes(Some(GuildId::new(42)));

        assert_eq!(prefixes.strip_prefix("$ping"), Some(("$", "ping")));
    }

    #[test]
    fn invite_uses_client_id_when_set() {
        let state = state(
            r#"
token = "t"
[oauth]
client_id = "555"
"#,
        );

        let link = state.invite_link(UserId::new(1), &InviteOptions::default());

        assert!(link.contains("client_id=555"));
    }

    #[test]
    fn invite_falls_back_to_bot_id() {
        let state = state(r#"token = "t""#);

        let link = state.invite_link(UserId::new(1), &InviteOptions::default());

        assert!(link.contains("client_id=1&"));
    }

    #[test]
    fn owners_from_config() {
        let state = state(
            r#"
token = "t"
owners = [1, 2]
"#,
        );

        assert_eq!(state.owner_ids(), vec![UserId::new(1), UserId::new(2)]);
        assert!(state.is_owner(UserId::new(2)));
        assert!(!state.is_owner(UserId::new(3)));
    }

    #[tokio::test]
    async fn no_webhook_without_url() {
        let state = state(r#"token = "t""#);
        let http = Http::new("");

        assert!(state.event_webhook(&http).await.unwrap().is_none());
    }
}
