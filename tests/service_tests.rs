//! Integration Tests for the Cached Player Service
//!
//! Drives the service against an instrumented store to observe exactly
//! when the store is consulted.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use common::{player, service, service_with, wait_until, CountingStore};
use player_cache::models::Player;
use player_cache::notifications::NotificationKind;
use player_cache::store::EntityStore;
use player_cache::transfer::{CsvFileSource, JsonFileSink};
use player_cache::{ImportPolicy, ServiceError, StoreError};

// == Read-through ==

#[tokio::test]
async fn test_read_after_read_skips_store() {
    let store = Arc::new(CountingStore::new());
    let saved = store.inner().save(player("Casper Ruud")).await.unwrap();
    let service = service(store.clone());

    service.find_by_id(saved.id).await.unwrap();
    service.find_by_id(saved.id).await.unwrap();

    assert_eq!(store.find_by_id_calls(), 1);
    assert_eq!(service.cache_stats().hits, 1);
    assert_eq!(service.cache_stats().misses, 1);
}

#[tokio::test]
async fn test_read_after_write_skips_store() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());

    let mut saved = service.create(player("Casper Ruud")).await.unwrap();
    service.find_by_id(saved.id).await.unwrap();

    saved.points = 6_000;
    service.update(saved.clone()).await.unwrap();
    let found = service.find_by_id(saved.id).await.unwrap();

    assert_eq!(found.points, 6_000);
    assert_eq!(store.find_by_id_calls(), 0);
}

#[tokio::test]
async fn test_invalidate_then_read_fetches_once() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());
    let saved = service.create(player("Casper Ruud")).await.unwrap();

    service.cache().invalidate(&saved.id);
    service.find_by_id(saved.id).await.unwrap();
    service.find_by_id(saved.id).await.unwrap();

    assert_eq!(store.find_by_id_calls(), 1);
}

#[tokio::test]
async fn test_missing_player_is_not_cached() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());

    for _ in 0..2 {
        assert!(matches!(
            service.find_by_id(404).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    assert_eq!(store.find_by_id_calls(), 2);
}

// == Capacity and TTL ==

#[tokio::test]
async fn test_cache_never_exceeds_capacity() {
    let store = Arc::new(CountingStore::new());
    let service = service_with(store, Duration::from_secs(600), 3);

    for i in 0..4 {
        service.create(player(&format!("Player {i}"))).await.unwrap();
        assert!(service.cache().len() <= 3);
    }

    assert_eq!(service.cache().len(), 3);
    assert_eq!(service.cache_stats().evictions, 1);
}

#[tokio::test]
async fn test_least_recently_used_player_is_evicted() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());

    for i in 1..=5 {
        let saved = service.create(player(&format!("Player {i}"))).await.unwrap();
        assert_eq!(saved.id, i);
    }
    service.find_by_id(1).await.unwrap();
    service.create(player("Player 6")).await.unwrap();

    let cache = service.cache();
    assert_eq!(cache.len(), 5);
    assert!(cache.contains(&1));
    assert!(!cache.contains(&2));
    for id in 3..=6 {
        assert!(cache.contains(&id));
    }

    // Evicted, so served by the store again
    service.find_by_id(2).await.unwrap();
    assert_eq!(store.find_by_id_calls(), 1);
}

#[tokio::test]
async fn test_expired_player_is_fetched_again() {
    let store = Arc::new(CountingStore::new());
    let service = service_with(store.clone(), Duration::from_millis(50), 5);
    let saved = service.create(player("Casper Ruud")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    service.find_by_id(saved.id).await.unwrap();

    assert_eq!(store.find_by_id_calls(), 1);
}

// == Validation ==

#[tokio::test]
async fn test_create_with_blank_name_never_saves() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());

    let err = service.create(player("   ")).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(store.save_calls(), 0);
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn test_invalid_update_leaves_cache_untouched() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());
    let saved = service.create(player("Casper Ruud")).await.unwrap();

    let mut invalid = saved.clone();
    invalid.height_cm = 0;
    let err = service.update(invalid).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(store.update_calls(), 0);
    assert_eq!(service.find_by_id(saved.id).await.unwrap(), saved);
    assert_eq!(store.find_by_id_calls(), 0);
}

// == Not found ==

#[tokio::test]
async fn test_update_missing_player_clears_cache_entry() {
    let store = Arc::new(CountingStore::new());
    let service = service_with(store.clone(), Duration::from_secs(600), 10);
    for i in 1..=7 {
        service.create(player(&format!("Player {i}"))).await.unwrap();
    }
    assert!(service.cache().contains(&7));

    // Removed from the store behind the service's back
    assert!(store.inner().delete(7).await.unwrap());

    let mut stale = player("Player 7");
    stale.id = 7;
    let err = service.update(stale).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(!service.cache().contains(&7));

    assert!(service.find_by_id(7).await.is_err());
    assert_eq!(store.find_by_id_calls(), 1);
}

#[tokio::test]
async fn test_delete_missing_player_is_not_found() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());

    assert!(matches!(
        service.delete(12).await,
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(store.delete_calls(), 1);
}

#[tokio::test]
async fn test_invalidate_absent_key_is_noop() {
    let service = service(Arc::new(CountingStore::new()));

    service.cache().invalidate(&99);
    service.cache().invalidate(&99);

    assert_eq!(service.cache_stats().invalidations, 0);
    assert!(service.cache().is_empty());
}

// == Storage failures ==

#[tokio::test]
async fn test_store_failure_surfaces_as_storage_error() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());
    store.set_failing(true);

    assert!(matches!(
        service.find_by_id(1).await,
        Err(ServiceError::Storage(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        service.create(player("Casper Ruud")).await,
        Err(ServiceError::Storage(_))
    ));
    assert!(matches!(service.find_all().await, Err(ServiceError::Storage(_))));
    assert!(service.cache().is_empty());
}

// == Cancellation ==

#[tokio::test]
async fn test_cancelled_read_leaves_no_cache_entry() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(CountingStore::with_read_gate(gate.clone()));
    let saved = store.inner().save(player("Casper Ruud")).await.unwrap();
    let service = service(store.clone());

    let read = tokio::time::timeout(Duration::from_millis(50), service.find_by_id(saved.id)).await;
    assert!(read.is_err());

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!service.cache().contains(&saved.id));
}

#[tokio::test]
async fn test_cancelled_create_still_completes() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(CountingStore::with_write_gate(gate.clone()));
    let service = service(store.clone());

    let create =
        tokio::time::timeout(Duration::from_millis(50), service.create(player("Casper Ruud")))
            .await;
    assert!(create.is_err());

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.inner().len().await, 1);
    assert!(service.cache().contains(&1));
}

#[tokio::test]
async fn test_cancelled_update_still_caches_new_value() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(CountingStore::with_write_gate(gate.clone()));
    let saved = store.inner().save(player("Casper Ruud")).await.unwrap();
    let service = service(store.clone());
    service.find_by_id(saved.id).await.unwrap();

    let mut changed = saved.clone();
    changed.points = 6_200;
    let update = tokio::time::timeout(Duration::from_millis(50), service.update(changed)).await;
    assert!(update.is_err());
    assert!(!service.cache().contains(&saved.id));

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(service.find_by_id(saved.id).await.unwrap().points, 6_200);
    assert_eq!(store.find_by_id_calls(), 1);
}

#[tokio::test]
async fn test_cancelled_delete_still_notifies() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(CountingStore::with_write_gate(gate.clone()));
    let saved = store.inner().save(player("Casper Ruud")).await.unwrap();
    let service = service(store.clone());
    service.find_by_id(saved.id).await.unwrap();
    let rx = service.subscribe();

    let delete = tokio::time::timeout(Duration::from_millis(50), service.delete(saved.id)).await;
    assert!(delete.is_err());

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(store.inner().is_empty().await);
    assert!(!service.cache().contains(&saved.id));
    let latest = rx.borrow().clone().unwrap();
    assert_eq!(latest.kind, NotificationKind::Deleted);
    assert_eq!(latest.entity_id, saved.id);
}

// == Reads racing writes ==

#[tokio::test]
async fn test_slow_read_does_not_cache_value_older_than_update() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(CountingStore::with_read_gate(gate.clone()));
    let mut saved = store.inner().save(player("Casper Ruud")).await.unwrap();
    let service = Arc::new(service(store.clone()));

    let reader = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.find_by_id(1).await }
    });
    wait_until(|| store.find_by_id_calls() == 1).await;

    saved.points = 9_999;
    service.update(saved.clone()).await.unwrap();
    gate.notify_one();

    // The in-flight read may still return what it fetched
    assert_eq!(reader.await.unwrap().unwrap().points, 5_000);

    assert_eq!(service.find_by_id(1).await.unwrap().points, 9_999);
    assert_eq!(store.find_by_id_calls(), 1);
}

#[tokio::test]
async fn test_slow_read_does_not_resurrect_deleted_player() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(CountingStore::with_read_gate(gate.clone()));
    store.inner().save(player("Casper Ruud")).await.unwrap();
    let service = Arc::new(service(store.clone()));

    let reader = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.find_by_id(1).await }
    });
    wait_until(|| store.find_by_id_calls() == 1).await;

    service.delete(1).await.unwrap();
    gate.notify_one();
    reader.await.unwrap().unwrap();

    assert!(!service.cache().contains(&1));
    gate.notify_one();
    assert!(matches!(
        service.find_by_id(1).await,
        Err(ServiceError::NotFound(_))
    ));
}

// == Bulk import/export ==

fn batch() -> Vec<Player> {
    vec![player("Holger Rune"), player(""), player("Stefanos Tsitsipas")]
}

#[tokio::test]
async fn test_fail_fast_import_stops_at_first_invalid() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());
    assert_eq!(service.import_policy(), ImportPolicy::FailFast);

    let err = service.import(&batch()).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    // Players saved before the failure stay committed
    assert_eq!(store.inner().len().await, 1);
    assert_eq!(store.save_calls(), 1);
}

#[tokio::test]
async fn test_best_effort_import_skips_invalid() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone()).with_import_policy(ImportPolicy::BestEffort);

    let report = service.import(&batch()).await.unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.inner().len().await, 2);
    assert_eq!(service.cache().len(), 2);
}

#[tokio::test]
async fn test_import_from_csv_file() {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "id,name,country,height_cm,weight_kg,points,hand,birth_date").unwrap();
    writeln!(file, "10,Daniil Medvedev,Russia,198,83,7000,right,1996-02-11").unwrap();
    writeln!(file, "11,Denis Shapovalov,Canada,185,75,1500,left,1999-04-15").unwrap();

    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());

    let report = service.import(&CsvFileSource::new(file.path())).await.unwrap();

    assert_eq!(report.imported, 2);
    // Ids come from the store, not the file
    let names: Vec<_> = service
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, "Daniil Medvedev".to_string()),
            (2, "Denis Shapovalov".to_string())
        ]
    );
}

#[tokio::test]
async fn test_import_from_missing_file_is_storage_error() {
    let service = service(Arc::new(CountingStore::new()));

    let err = service
        .import(&CsvFileSource::new("/nonexistent/players.csv"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Storage(StoreError::Io(_))));
}

#[tokio::test]
async fn test_export_writes_every_player() {
    let store = Arc::new(CountingStore::new());
    let service = service(store.clone());
    service.create(player("Holger Rune")).await.unwrap();
    service.create(player("Stefanos Tsitsipas")).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.json");
    let written = service.export(&JsonFileSink::new(&path)).await.unwrap();

    assert_eq!(written, 2);
    let exported: Vec<Player> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(exported, service.find_all().await.unwrap());
}
