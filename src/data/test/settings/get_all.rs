use super::*;
use test_utils::factory::guild_settings::GuildSettingsFactory;

/// Tests that every non-sentinel row is returned.
///
/// Expected: Ok with two rows, sentinel excluded
#[tokio::test]
async fn returns_rows_without_sentinel() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, Some("!")).await?;
    GuildSettingsFactory::new(db)
        .guild_id(42)
        .prefix(Some("?"))
        .build()
        .await?;
    GuildSettingsFactory::new(db).guild_id(43).build().await?;

    let mut rows = SettingsRepository::guilds(db).get_all().await?;
    rows.sort_by_key(|row| row.id);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 42);
    assert_eq!(rows[0].values.get("prefix"), Some(&json!("?")));
    assert_eq!(rows[1].id, 43);
    assert_eq!(rows[1].values.get("prefix"), Some(&json!(null)));
    assert!(rows.iter().all(|row| row.id != SENTINEL_ID));

    Ok(())
}

/// Tests that large Discord snowflakes survive the round trip.
///
/// Expected: Ok with the exact ID
#[tokio::test]
async fn keeps_snowflake_ids_exact() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    test_utils::factory::user_settings::UserSettingsFactory::new(db)
        .user_id(141231597155385344)
        .build()
        .await?;

    let rows = SettingsRepository::users(db).get_all().await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 141231597155385344);
    assert_eq!(rows[0].values.get("user_id"), Some(&json!(141231597155385344u64)));

    Ok(())
}

/// Tests an empty table.
///
/// Expected: Ok with no rows
#[tokio::test]
async fn returns_empty_for_empty_table() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let rows = SettingsRepository::guilds(db).get_all().await?;

    assert!(rows.is_empty());

    Ok(())
}
