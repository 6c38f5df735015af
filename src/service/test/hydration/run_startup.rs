use super::*;
use crate::{error::supervise, extension::Extension};
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use serenity::async_trait;
use std::{sync::Arc, time::Duration};

/// Extension that records when its cache setup runs and how many guilds were cached.
struct CacheWatcher {
    store: Arc<SettingsStore>,
    seen: Arc<Mutex<Vec<usize>>>,
    fail: bool,
}

#[async_trait]
impl Extension for CacheWatcher {
    fn name(&self) -> &str {
        "watcher"
    }

    async fn cache_setup(&self, _db: &DatabaseConnection) -> Result<(), AppError> {
        self.seen.lock().push(self.store.len(SettingsKind::Guild));
        if self.fail {
            return Err(sea_orm::DbErr::Custom("cache setup failed".to_string()).into());
        }
        Ok(())
    }
}

/// Tests the full sequence with an already ready gateway.
///
/// Verifies that extensions run after the caches are hydrated.
///
/// Expected: Ok with the watcher seeing one cached guild
#[tokio::test]
async fn runs_extensions_after_hydration() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::create_guild_settings(db).await?;

    let store = Arc::new(SettingsStore::new("!"));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let extensions = ExtensionRegistry::new().register(CacheWatcher {
        store: store.clone(),
        seen: seen.clone(),
        fail: false,
    });
    let ready = ReadySignal::new(1);
    ready.mark_ready(0);

    run_startup(db.clone(), &store, &extensions, &ready).await?;

    assert_eq!(*seen.lock(), vec![1]);

    Ok(())
}

/// Tests that the sequence doesn't finish before the gateway is ready.
///
/// Expected: Still pending until the shard is marked ready, then Ok
#[tokio::test]
async fn waits_for_ready() -> Result<(), AppError> {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap().clone();

    let store = Arc::new(SettingsStore::new("!"));
    let ready = ReadySignal::new(1);

    let task = {
        let store = store.clone();
        let ready = ready.clone();
        tokio::spawn(async move {
            run_startup(db, &store, &ExtensionRegistry::new(), &ready).await
        })
    };

    let pending = tokio::time::timeout(Duration::from_millis(200), async {
        while !store.defaults(SettingsKind::User).contains_key("user_id") {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(pending.is_ok());
    assert!(!task.is_finished());

    ready.mark_ready(0);
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap()?;

    Ok(())
}

/// Tests that an extension error is returned from the sequence.
///
/// Expected: Err(AppError::DbErr) without waiting for the gateway
#[tokio::test]
async fn returns_extension_error() {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = Arc::new(SettingsStore::new("!"));
    let extensions = ExtensionRegistry::new().register(CacheWatcher {
        store: store.clone(),
        seen: Arc::default(),
        fail: true,
    });
    let ready = ReadySignal::new(1);

    let result = run_startup(db.clone(), &store, &extensions, &ready).await;

    assert!(matches!(result, Err(AppError::DbErr(_))));
}

/// Tests that a database error stops the sequence before extensions run.
///
/// Expected: Err(AppError::DbErr) and the watcher never runs
#[tokio::test]
async fn database_error_skips_extensions() {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = Arc::new(SettingsStore::new("!"));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let extensions = ExtensionRegistry::new().register(CacheWatcher {
        store: store.clone(),
        seen: seen.clone(),
        fail: false,
    });
    let ready = ReadySignal::new(1);

    let result = run_startup(db.clone(), &store, &extensions, &ready).await;

    assert!(matches!(result, Err(AppError::DbErr(_))));
    assert!(seen.lock().is_empty());
}

/// Tests that a failed startup is handed to the fatal hook.
///
/// Expected: The hook receives the database error from the missing tables
#[tokio::test]
async fn failed_startup_reaches_fatal_hook() {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap().clone();

    let store = Arc::new(SettingsStore::new("!"));
    let ready = ReadySignal::new(1);
    let failure: Arc<Mutex<Option<AppError>>> = Arc::default();

    let hook = failure.clone();
    supervise(
        run_startup(db, &store, &ExtensionRegistry::new(), &ready),
        move |e| *hook.lock() = Some(e),
    )
    .await;

    assert!(matches!(*failure.lock(), Some(AppError::DbErr(_))));
}

/// Tests that a successful startup never calls the fatal hook.
///
/// Expected: Hook not called
#[tokio::test]
async fn successful_startup_skips_fatal_hook() {
    let test = TestBuilder::new().with_settings_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap().clone();

    let store = Arc::new(SettingsStore::new("!"));
    let ready = ReadySignal::new(1);
    ready.mark_ready(0);
    let called = Arc::new(Mutex::new(false));

    let hook = called.clone();
    supervise(
        run_startup(db, &store, &ExtensionRegistry::new(), &ready),
        move |_| *hook.lock() = true,
    )
    .await;

    assert!(!*called.lock());
}
