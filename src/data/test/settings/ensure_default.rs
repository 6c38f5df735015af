use super::*;
use sea_orm::{EntityTrait, PaginatorTrait};

/// Tests that an existing sentinel row is returned unchanged.
///
/// Expected: Ok with the stored prefix and no extra row inserted
#[tokio::test]
async fn returns_existing_sentinel() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_default_guild_settings(db, Some("$")).await?;

    let row = SettingsRepository::guilds(db).ensure_default().await?;

    assert_eq!(row.values.get("prefix"), Some(&json!("$")));
    let count = entity::prelude::GuildSettings::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests that the sentinel row is created when missing.
///
/// Expected: Ok with user_id 0, and the row is persisted
#[tokio::test]
async fn creates_missing_sentinel() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SettingsRepository::users(db);
    let row = repo.ensure_default().await?;

    assert_eq!(row.id, SENTINEL_ID);
    assert!(repo.find_default().await?.is_some());

    Ok(())
}
