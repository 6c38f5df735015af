use super::*;

/// Tests reading the sentinel guild row.
///
/// Expected: Ok(Some) with guild_id 0 and the stored prefix
#[tokio::test]
async fn finds_existing_sentinel() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, Some("!")).await?;
    factory::create_guild_settings(db).await?;

    let row = SettingsRepository::guilds(db).find_default().await?;

    let row = row.expect("sentinel row should exist");
    assert_eq!(row.id, SENTINEL_ID);
    assert_eq!(row.values.get("guild_id"), Some(&json!(0)));
    assert_eq!(row.values.get("prefix"), Some(&json!("!")));

    Ok(())
}

/// Tests reading the sentinel row from an empty table.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_without_sentinel() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user_settings(db).await?;

    let row = SettingsRepository::users(db).find_default().await?;

    assert!(row.is_none());

    Ok(())
}

/// Tests that columns added outside the entity model are returned.
///
/// Expected: Ok(Some) with the extra column's default value
#[tokio::test]
async fn includes_extra_columns() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_settings_tables()
        .with_statement("ALTER TABLE guild_settings ADD COLUMN language TEXT DEFAULT 'en'")
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, None).await?;

    let row = SettingsRepository::guilds(db).find_default().await?.unwrap();

    assert_eq!(row.values.get("language"), Some(&json!("en")));
    assert_eq!(row.values.get("prefix"), Some(&json!(null)));

    Ok(())
}

/// Tests that a missing table surfaces as a database error.
///
/// Expected: Err(AppError::DbErr)
#[tokio::test]
async fn fails_without_table() {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = SettingsRepository::new(db, SettingsKind::Guild)
        .find_default()
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));
}
