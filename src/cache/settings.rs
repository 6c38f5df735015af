//! In-memory settings cache for one settings table.

use std::collections::HashMap;

use crate::model::settings::{Settings, SettingsRow, SENTINEL_ID};

/// Per-entity settings for one table, backed by a default record.
///
/// Unknown entities are materialized lazily from a clone of the defaults, so every entity
/// sees the full default key set. Nothing here touches the database; writes stay in memory.
#[derive(Debug, Clone, Default)]
pub struct SettingsCache {
    defaults: Settings,
    entries: HashMap<u64, Settings>,
}

impl SettingsCache {
    /// Creates an empty cache seeded with the given defaults.
    pub fn new(defaults: Settings) -> Self {
        Self {
            defaults,
            entries: HashMap::new(),
        }
    }

    /// The default record new entities are copied from.
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }

    /// Returns the settings for `id`, inserting a copy of the defaults if it is not cached.
    ///
    /// Repeated calls return the same stored record, so changes made through the returned
    /// reference are seen by later calls. The defaults are cloned, never shared.
    pub fn get(&mut self, id: u64) -> &mut Settings {
        let defaults = &self.defaults;
        self.entries.entry(id).or_insert_with(|| defaults.clone())
    }

    /// Returns the cached settings for `id` without materializing them.
    #[cfg(test)]
    pub fn peek(&self, id: u64) -> Option<&Settings> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached entity. The defaults are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merges the sentinel row into the defaults.
    ///
    /// Only keys missing from the defaults are added; existing defaults are never
    /// overwritten.
    pub fn hydrate_defaults(&mut self, sentinel: &Settings) {
        for (key, value) in sentinel {
            self.defaults
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Writes every column of every row into the cache.
    ///
    /// Entities are created from the defaults first, then each column in the row
    /// overwrites the cached value. Keys absent from a row keep their current value. The
    /// sentinel row is skipped so it never appears as an entity.
    pub fn hydrate_all(&mut self, rows: impl IntoIterator<Item = SettingsRow>) {
        for row in rows {
            if row.id == SENTINEL_ID {
                continue;
            }

            let entry = self.get(row.id);
            for (key, value) in row.values {
                entry.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn settings(value: Value) -> Settings {
        match value {
            Value::Object(map) => map,
            _ => panic!("test settings must be an object"),
        }
    }

    fn row(id: u64, value: Value) -> SettingsRow {
        SettingsRow {
            id,
            values: settings(value),
        }
    }

    /// Tests that an unknown entity materializes as a copy of the defaults.
    ///
    /// Expected: the new entry equals the defaults and is now cached
    #[test]
    fn get_materializes_defaults_for_unknown_entity() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!" })));

        let entry = cache.get(99).clone();

        assert_eq!(entry, settings(json!({ "prefix": "!" })));
        assert!(cache.contains(99));
        assert_eq!(cache.len(), 1);
    }

    /// Tests that repeated calls return the stored record rather than a fresh copy.
    ///
    /// Expected: a mutation through the first call is visible on the second
    #[test]
    fn get_returns_the_same_stored_record() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!" })));

        cache.get(7).insert("prefix".to_string(), json!("$"));

        assert_eq!(cache.get(7).get("prefix"), Some(&json!("$")));
    }

    /// Tests that mutating an entity never leaks into the defaults or other entities.
    ///
    /// Expected: defaults and a second entity keep the original value
    #[test]
    fn get_copies_defaults_by_value() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!" })));

        cache.get(1).insert("prefix".to_string(), json!("?"));

        assert_eq!(cache.defaults().get("prefix"), Some(&json!("!")));
        assert_eq!(cache.get(2).get("prefix"), Some(&json!("!")));
    }

    /// Tests that the sentinel row only fills in missing default keys.
    ///
    /// Expected: new keys added, pre-existing `prefix` left alone
    #[test]
    fn hydrate_defaults_never_overwrites() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!" })));

        cache.hydrate_defaults(&settings(json!({
            "guild_id": 0,
            "prefix": null,
            "language": "en",
        })));

        assert_eq!(cache.defaults().get("prefix"), Some(&json!("!")));
        assert_eq!(cache.defaults().get("language"), Some(&json!("en")));
        assert_eq!(cache.defaults().get("guild_id"), Some(&json!(0)));
    }

    /// Tests that the sentinel supplies values when the defaults start empty.
    ///
    /// Expected: defaults equal the sentinel row exactly
    #[test]
    fn hydrate_defaults_into_empty_defaults() {
        let mut cache = SettingsCache::default();
        let sentinel = settings(json!({ "user_id": 0, "timezone": "UTC" }));

        cache.hydrate_defaults(&sentinel);

        assert_eq!(cache.defaults(), &sentinel);
        assert!(cache.is_empty());
    }

    /// Tests that row columns overwrite cached values while other keys keep their defaults.
    ///
    /// Expected: row column wins, untouched default key survives
    #[test]
    fn hydrate_all_overwrites_only_row_columns() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!", "language": "en" })));

        cache.hydrate_all(vec![row(42, json!({ "guild_id": 42, "prefix": "?" }))]);

        let entry = cache.get(42);
        assert_eq!(entry.get("prefix"), Some(&json!("?")));
        assert_eq!(entry.get("language"), Some(&json!("en")));
        assert_eq!(entry.get("guild_id"), Some(&json!(42)));
    }

    /// Tests that extra columns not present in the defaults are kept on the entity.
    ///
    /// Expected: entity has the extra key, defaults do not
    #[test]
    fn hydrate_all_keeps_extra_columns() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!" })));

        cache.hydrate_all(vec![row(5, json!({ "beta": true }))]);

        assert_eq!(cache.get(5).get("beta"), Some(&json!(true)));
        assert!(cache.defaults().get("beta").is_none());
    }

    /// Tests that the sentinel row never becomes an entity.
    ///
    /// Expected: ID 0 not cached
    #[test]
    fn hydrate_all_skips_sentinel() {
        let mut cache = SettingsCache::default();

        cache.hydrate_all(vec![
            row(0, json!({ "guild_id": 0 })),
            row(3, json!({ "guild_id": 3 })),
        ]);

        assert!(!cache.contains(0));
        assert!(cache.contains(3));
    }

    /// Tests that clearing drops entities but keeps the defaults.
    ///
    /// Expected: empty cache, defaults intact
    #[test]
    fn clear_keeps_defaults() {
        let mut cache = SettingsCache::new(settings(json!({ "prefix": "!" })));
        cache.get(1);
        cache.get(2);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.defaults().get("prefix"), Some(&json!("!")));
    }

    /// Tests that peeking never materializes an entity.
    ///
    /// Expected: `None`, cache still empty
    #[test]
    fn peek_does_not_insert() {
        let cache = SettingsCache::new(settings(json!({ "prefix": "!" })));

        assert!(cache.peek(10).is_none());
        assert!(cache.is_empty());
    }
}
