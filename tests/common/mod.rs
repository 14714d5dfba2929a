//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use player_cache::cache::CacheSettings;
use player_cache::models::{Hand, Player};
use player_cache::store::{EntityStore, MemoryStore};
use player_cache::validator::PlayerValidator;
use player_cache::{EntityService, StoreError};

// == Counting Store ==
/// Store double that records every call, can be switched into a failing
/// mode, and can hold calls until a gate is opened.
///
/// A gated `find_by_id` reads the row first and then waits, like a slow
/// response on the wire. Gated writes wait before touching the rows.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore<Player>,
    find_by_id_calls: AtomicUsize,
    save_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    failing: AtomicBool,
    read_gate: Option<Arc<Notify>>,
    write_gate: Option<Arc<Notify>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `find_by_id` waits for one permit on `gate` after reading.
    pub fn with_read_gate(gate: Arc<Notify>) -> Self {
        Self {
            read_gate: Some(gate),
            ..Self::default()
        }
    }

    /// Every `save`, `update` and `delete` waits for one permit on `gate`.
    pub fn with_write_gate(gate: Arc<Notify>) -> Self {
        Self {
            write_gate: Some(gate),
            ..Self::default()
        }
    }

    /// The wrapped store, for arranging rows behind the service's back.
    pub fn inner(&self) -> &MemoryStore<Player> {
        &self.inner
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    async fn pass(gate: &Option<Arc<Notify>>) {
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl EntityStore<Player> for CountingStore {
    async fn find_all(&self) -> Result<Vec<Player>, StoreError> {
        self.check()?;
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, StoreError> {
        self.check()?;
        let row = self.inner.find_by_id(id).await;
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.read_gate).await;
        row
    }

    async fn save(&self, entity: Player) -> Result<Player, StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.write_gate).await;
        self.check()?;
        self.inner.save(entity).await
    }

    async fn update(&self, entity: Player) -> Result<Option<Player>, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.write_gate).await;
        self.check()?;
        self.inner.update(entity).await
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.write_gate).await;
        self.check()?;
        self.inner.delete(id).await
    }
}

pub type TestService = EntityService<Player, CountingStore, PlayerValidator>;

pub fn service_with(store: Arc<CountingStore>, ttl: Duration, max_entries: usize) -> TestService {
    EntityService::new(
        store,
        PlayerValidator::new(),
        CacheSettings::new(ttl, max_entries),
    )
}

/// Service with the default cache settings (10 minutes, 5 entries).
pub fn service(store: Arc<CountingStore>) -> TestService {
    service_with(store, Duration::from_secs(600), 5)
}

/// Yields until `done` holds, for handing off to spawned tasks.
pub async fn wait_until(done: impl Fn() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

pub fn player(name: &str) -> Player {
    Player::new(
        name,
        "Norway",
        183,
        77,
        5_000,
        Hand::Right,
        NaiveDate::from_ymd_opt(1998, 12, 15).unwrap(),
    )
}
