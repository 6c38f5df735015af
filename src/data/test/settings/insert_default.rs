use super::*;

/// Tests inserting the sentinel guild row into an empty table.
///
/// Verifies that the row comes back with guild_id 0 and every other column at its
/// database default.
///
/// Expected: Ok with guild_id 0 and a null prefix
#[tokio::test]
async fn inserts_sentinel_with_database_defaults() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let row = SettingsRepository::guilds(db).insert_default().await?;

    assert_eq!(row.id, SENTINEL_ID);
    assert_eq!(row.values.get("guild_id"), Some(&json!(0)));
    assert_eq!(row.values.get("prefix"), Some(&json!(null)));
    assert_eq!(row.values.len(), 2);

    Ok(())
}

/// Tests that inserting a second sentinel row fails on the primary key.
///
/// Expected: Err(AppError::DbErr)
#[tokio::test]
async fn fails_when_sentinel_exists() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_user_settings(db).await?;

    let result = SettingsRepository::users(db).insert_default().await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}
