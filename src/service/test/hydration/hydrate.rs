use super::*;
use sea_orm::ConnectionTrait;
use test_utils::factory::guild_settings::GuildSettingsFactory;

/// Tests hydrating from empty settings tables.
///
/// Verifies that the sentinel rows are created, the defaults gain the sentinel's columns
/// without losing the configured prefix, and no entity is cached until first access.
///
/// Expected: Ok with empty caches and both sentinel rows inserted
#[tokio::test]
async fn creates_sentinels_for_empty_tables() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let store = SettingsStore::new("!");

    SettingsHydrationService::new(db, &store).hydrate().await?;

    let defaults = store.defaults(SettingsKind::Guild);
    assert_eq!(defaults.get("prefix"), Some(&json!("!")));
    assert_eq!(defaults.get("guild_id"), Some(&json!(0)));
    assert_eq!(defaults.len(), 2);
    assert_eq!(
        store.defaults(SettingsKind::User).get("user_id"),
        Some(&json!(0))
    );
    assert_eq!(store.len(SettingsKind::Guild), 0);
    assert_eq!(store.len(SettingsKind::User), 0);

    let sentinel = crate::data::settings::SettingsRepository::guilds(db)
        .find_default()
        .await?;
    assert!(sentinel.is_some());

    Ok(())
}

/// Tests hydrating a guild with its own prefix next to the sentinel row.
///
/// Verifies the default prefix keeps the configured value, the stored guild gets its own
/// prefix, and an unknown guild falls back to the default.
///
/// Expected: Ok with guild 42 using `?` and guild 99 using the default
#[tokio::test]
async fn loads_guild_rows_over_defaults() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, Some("!")).await?;
    GuildSettingsFactory::new(db)
        .guild_id(42)
        .prefix(Some("?"))
        .build()
        .await?;

    let store = SettingsStore::new("$");
    SettingsHydrationService::new(db, &store).hydrate().await?;

    assert_eq!(
        store.defaults(SettingsKind::Guild).get("prefix"),
        Some(&json!("$"))
    );
    assert_eq!(store.guild(42).get("prefix"), Some(&json!("?")));
    assert_eq!(store.guild(99).get("prefix"), Some(&json!("$")));

    Ok(())
}

/// Tests that the sentinel row supplies defaults the seed doesn't have.
///
/// Expected: Ok with the user defaults taken from the sentinel row
#[tokio::test]
async fn sentinel_fills_missing_defaults() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_settings_tables()
        .with_statement("ALTER TABLE user_settings ADD COLUMN timezone TEXT DEFAULT 'UTC'")
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_user_settings(db).await?;
    factory::create_user_settings(db).await?;

    let store = SettingsStore::new("!");
    SettingsHydrationService::new(db, &store).hydrate().await?;

    assert_eq!(
        store.defaults(SettingsKind::User).get("timezone"),
        Some(&json!("UTC"))
    );
    assert_eq!(store.user(123).get("timezone"), Some(&json!("UTC")));

    Ok(())
}

/// Tests that entity rows overwrite only the columns they carry.
///
/// Expected: Ok with the row's value winning and other default keys kept
#[tokio::test]
async fn entity_rows_overwrite_their_columns() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_settings_tables()
        .with_statement("ALTER TABLE guild_settings ADD COLUMN language TEXT DEFAULT 'en'")
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, Some("!")).await?;
    GuildSettingsFactory::new(db).guild_id(42).build().await?;
    db.execute_unprepared("UPDATE guild_settings SET language = 'fr' WHERE guild_id = 42")
        .await?;

    let store = SettingsStore::new("!");
    store.update(SettingsKind::Guild, 42, |settings| {
        settings.insert("stale".to_string(), json!(true));
    });
    SettingsHydrationService::new(db, &store).hydrate().await?;

    let guild = store.guild(42);
    assert_eq!(guild.get("language"), Some(&json!("fr")));
    assert_eq!(guild.get("prefix"), Some(&json!(null)));
    assert_eq!(guild.get("guild_id"), Some(&json!(42)));
    assert!(!guild.contains_key("stale"));

    Ok(())
}

/// Tests that the sentinel never appears as a cached entity.
///
/// Expected: Ok with only real guilds cached
#[tokio::test]
async fn sentinel_is_not_cached() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, Some("!")).await?;
    factory::create_guild_settings(db).await?;
    factory::create_guild_settings(db).await?;

    let store = SettingsStore::new("!");
    let count = SettingsHydrationService::new(db, &store)
        .hydrate_kind(SettingsKind::Guild)
        .await?;

    assert_eq!(count, 2);
    assert_eq!(store.len(SettingsKind::Guild), 2);
    assert!(!store.contains(SettingsKind::Guild, 0));

    Ok(())
}

/// Tests that hydration fails when the settings tables don't exist.
///
/// Expected: Err(AppError::DbErr)
#[tokio::test]
async fn fails_without_tables() {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let store = SettingsStore::new("!");

    let result = SettingsHydrationService::new(db, &store).hydrate().await;

    assert!(matches!(result, Err(AppError::DbErr(_))));
}
