//! TOML configuration for the bot.
//!
//! The configuration file is read once at startup into a typed [`Config`]. Every section
//! is optional except `token`; missing sections fall back to the defaults below. Keys the
//! bot doesn't know about are kept in [`Config::extra`] so extensions can read their own
//! options from the same file.
//!
//! [`ConfigHandle`] is what the rest of the bot holds. Readers take a cheap `Arc<Config>`
//! snapshot; `reload()` parses the file again and swaps the snapshot in one step, so a
//! reader never sees half of an old config and half of a new one.

pub mod cli;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use serde::Deserialize;
use serenity::all::GatewayIntents;

use crate::error::{config::ConfigError, fatal};

const DEFAULT_CHATLOG_URL: &str = "https://voxelfox.co.uk/discord/chatlog";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot token used to log in to the gateway.
    pub token: String,
    /// User IDs that bypass permission checks.
    #[serde(default)]
    pub owners: Vec<u64>,
    #[serde(default)]
    pub dm_uncaught_errors: bool,
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    /// Guild returned by `fetch_support_guild`; `0` disables it.
    #[serde(default)]
    pub support_guild_id: u64,
    /// Webhook some events are posted to; empty disables it.
    #[serde(default)]
    pub event_webhook_url: String,
    /// Endpoint message logs are exported to.
    #[serde(default = "default_chatlog_url")]
    pub chatlog_url: String,
    /// Gateway intents. When no flag is set the bot uses guilds, guild messages and direct
    /// messages.
    #[serde(default)]
    pub intents: Option<IntentsConfig>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub statsd: StatsdConfig,
    #[serde(default)]
    pub bot_listing_api_keys: BotListingConfig,
    #[serde(default)]
    pub google_analytics: GoogleAnalyticsConfig,
    /// Every top-level key not listed above.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Named gateway intent flags. Unset flags are off.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntentsConfig {
    pub guilds: bool,
    pub members: bool,
    pub bans: bool,
    pub emojis: bool,
    pub integrations: bool,
    pub webhooks: bool,
    pub invites: bool,
    pub voice_states: bool,
    pub presences: bool,
    pub guild_messages: bool,
    pub dm_messages: bool,
    pub guild_reactions: bool,
    pub dm_reactions: bool,
    pub guild_typing: bool,
    pub dm_typing: bool,
    pub message_content: bool,
}

impl IntentsConfig {
    pub fn to_gateway_intents(&self) -> GatewayIntents {
        [
            (self.guilds, GatewayIntents::GUILDS),
            (self.members, GatewayIntents::GUILD_MEMBERS),
            (self.bans, GatewayIntents::GUILD_MODERATION),
            (self.emojis, GatewayIntents::GUILD_EMOJIS_AND_STICKERS),
            (self.integrations, GatewayIntents::GUILD_INTEGRATIONS),
            (self.webhooks, GatewayIntents::GUILD_WEBHOOKS),
            (self.invites, GatewayIntents::GUILD_INVITES),
            (self.voice_states, GatewayIntents::GUILD_VOICE_STATES),
            (self.presences, GatewayIntents::GUILD_PRESENCES),
            (self.guild_messages, GatewayIntents::GUILD_MESSAGES),
            (self.dm_messages, GatewayIntents::DIRECT_MESSAGES),
            (self.guild_reactions, GatewayIntents::GUILD_MESSAGE_REACTIONS),
            (self.dm_reactions, GatewayIntents::DIRECT_MESSAGE_REACTIONS),
            (self.guild_typing, GatewayIntents::GUILD_MESSAGE_TYPING),
            (self.dm_typing, GatewayIntents::DIRECT_MESSAGE_TYPING),
            (self.message_content, GatewayIntents::MESSAGE_CONTENT),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .fold(GatewayIntents::empty(), |acc, (_, intent)| acc | intent)
    }
}

/// Connection options for the relational database.
///
/// Either `url` is given directly, or it is assembled from the Postgres style fields.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub enabled: bool,
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            host: "127.0.0.1".to_string(),
            port: 5432,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RedisConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
        }
    }
}

impl RedisConfig {
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresenceConfig {
    /// One of `playing`, `listening`, `watching`, `competing`, `streaming`, `custom`.
    pub activity_type: String,
    pub text: String,
    /// One of `online`, `idle`, `dnd`, `invisible`.
    pub status: String,
    /// Stream URL, only used with the `streaming` activity type.
    pub url: Option<String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            activity_type: "playing".to_string(),
            text: String::new(),
            status: "online".to_string(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OAuthConfig {
    /// Application ID used in invite links. Falls back to the bot's user ID when empty.
    pub client_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
    /// Tags attached to every metric. Stats are disabled while `service` is empty.
    pub constant_tags: BTreeMap<String, String>,
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8125,
            constant_tags: BTreeMap::new(),
        }
    }
}

impl StatsdConfig {
    pub fn is_enabled(&self) -> bool {
        self.constant_tags
            .get("service")
            .is_some_and(|service| !service.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotListingConfig {
    pub topgg_token: String,
    pub discordbotlist_token: String,
}

/// Measurement protocol settings. Pageviews are only sent when every field is set.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoogleAnalyticsConfig {
    pub tracking_id: String,
    pub app_name: String,
    pub document_host: String,
}

impl GoogleAnalyticsConfig {
    pub fn is_enabled(&self) -> bool {
        [&self.tracking_id, &self.app_name, &self.document_host]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_chatlog_url() -> String {
    DEFAULT_CHATLOG_URL.to_string()
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Arguments
    /// - `path` - Path the text was read from, used in error messages
    /// - `content` - TOML document
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a configuration file.
    ///
    /// # Returns
    /// - `Ok(Config)` - Parsed configuration
    /// - `Err(ConfigError::Read)` - File missing or unreadable
    /// - `Err(ConfigError::Parse)` - Invalid TOML or missing `token`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(path, &content)
    }

    /// Gateway intents requested at login.
    pub fn gateway_intents(&self) -> GatewayIntents {
        let intents = self
            .intents
            .as_ref()
            .map(IntentsConfig::to_gateway_intents)
            .unwrap_or_else(GatewayIntents::empty);

        if intents.is_empty() {
            GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES
        } else {
            intents
        }
    }

    /// The event webhook URL, if one is configured.
    pub fn event_webhook_url(&self) -> Option<&str> {
        let url = self.event_webhook_url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Whether `user_id` is listed as a bot owner.
    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owners.contains(&user_id)
    }
}

/// Shared, reloadable handle to the current configuration.
#[derive(Clone)]
pub struct ConfigHandle {
    path: PathBuf,
    current: Arc<RwLock<Arc<Config>>>,
}

impl ConfigHandle {
    /// Loads the configuration file for the first time.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        tracing::info!("Loading config from {}", path.display());
        let config = Config::from_file(&path)?;

        Ok(Self {
            path,
            current: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    /// Wraps an already parsed configuration. Reloading re-reads `path`.
    pub fn from_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Snapshot of the current configuration.
    pub fn get(&self) -> Arc<Config> {
        self.current.read().clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the configuration file and swaps it in.
    ///
    /// On error the previous configuration stays in place and the error is returned.
    pub fn reload(&self) -> Result<(), ConfigError> {
        tracing::info!("Reloading config");
        let config = Config::from_file(&self.path)?;
        *self.current.write() = Arc::new(config);
        Ok(())
    }

    /// Re-reads the configuration file, terminating the process if it can't be loaded.
    pub fn reload_or_exit(&self) {
        if let Err(e) = self.reload() {
            fatal(e);
        }
    }
}
