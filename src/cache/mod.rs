//! Process-wide guild and user settings caches.
//!
//! `SettingsStore` owns one [`SettingsCache`] per settings table behind a synchronous
//! lock. Every operation takes the lock, does its work and releases it without awaiting,
//! so a reader can never observe an entity halfway through being materialized from the
//! defaults. The store is shared through `BotState` as an `Arc`.

pub mod settings;

use parking_lot::RwLock;
use serde_json::Value;

use crate::model::settings::{Settings, SettingsKind, SettingsRow};

pub use settings::SettingsCache;

pub struct SettingsStore {
    guilds: RwLock<SettingsCache>,
    users: RwLock<SettingsCache>,
}

impl SettingsStore {
    /// Creates the store with its initial defaults.
    ///
    /// Guilds start with `prefix` set to the configured default prefix; users start with
    /// no defaults. Both are extended from the sentinel rows during hydration.
    ///
    /// # Arguments
    /// - `default_prefix` - `default_prefix` from the configuration file
    pub fn new(default_prefix: &str) -> Self {
        let mut guild_defaults = Settings::new();
        guild_defaults.insert(
            "prefix".to_string(),
            Value::String(default_prefix.to_string()),
        );

        Self {
            guilds: RwLock::new(SettingsCache::new(guild_defaults)),
            users: RwLock::new(SettingsCache::default()),
        }
    }

    fn cache(&self, kind: SettingsKind) -> &RwLock<SettingsCache> {
        match kind {
            SettingsKind::Guild => &self.guilds,
            SettingsKind::User => &self.users,
        }
    }

    /// Returns a snapshot of an entity's settings, materializing it from the defaults if
    /// it is not cached yet.
    pub fn get(&self, kind: SettingsKind, id: u64) -> Settings {
        self.cache(kind).write().get(id).clone()
    }

    /// Returns a single setting for an entity, materializing the entity if needed.
    pub fn value(&self, kind: SettingsKind, id: u64, key: &str) -> Option<Value> {
        self.cache(kind).write().get(id).get(key).cloned()
    }

    /// Runs `f` against the stored settings of an entity.
    ///
    /// The closure sees the cached record itself, so its changes are visible to every later
    /// reader. It runs under the write lock and must not block.
    pub fn update<R>(&self, kind: SettingsKind, id: u64, f: impl FnOnce(&mut Settings) -> R) -> R {
        f(self.cache(kind).write().get(id))
    }

    /// Returns a copy of the default record for a table.
    pub fn defaults(&self, kind: SettingsKind) -> Settings {
        self.cache(kind).read().defaults().clone()
    }

    /// Whether an entity has been cached, without materializing it.
    pub fn contains(&self, kind: SettingsKind, id: u64) -> bool {
        self.cache(kind).read().contains(id)
    }

    /// Number of cached entities for a table.
    pub fn len(&self, kind: SettingsKind) -> usize {
        self.cache(kind).read().len()
    }

    /// Drops all cached guilds and users.
    pub fn clear(&self) {
        self.guilds.write().clear();
        self.users.write().clear();
    }

    /// Merges a sentinel row into a table's defaults without overwriting existing keys.
    pub fn hydrate_defaults(&self, kind: SettingsKind, sentinel: &Settings) {
        self.cache(kind).write().hydrate_defaults(sentinel);
    }

    /// Writes every row into a table's cache.
    pub fn hydrate_all(&self, kind: SettingsKind, rows: Vec<SettingsRow>) {
        self.cache(kind).write().hydrate_all(rows);
    }

    /// Convenience accessor for a guild's settings.
    pub fn guild(&self, guild_id: u64) -> Settings {
        self.get(SettingsKind::Guild, guild_id)
    }

    /// Convenience accessor for a user's settings.
    pub fn user(&self, user_id: u64) -> Settings {
        self.get(SettingsKind::User, user_id)
    }

    /// The guild's stored prefix, if it is set to a non-empty string.
    pub fn guild_prefix(&self, guild_id: u64) -> Option<String> {
        match self.value(SettingsKind::Guild, guild_id, "prefix") {
            Some(Value::String(prefix)) if !prefix.is_empty() => Some(prefix),
            _ => None,
        }
    }
}
