//! In-memory entity store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::models::Entity;
use crate::store::EntityStore;

/// Entity store backed by an ordered map, with ids assigned from a sequence starting at 1.
#[derive(Debug)]
pub struct MemoryStore<E> {
    rows: RwLock<BTreeMap<i64, E>>,
    next_id: AtomicI64,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn find_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: E) -> Result<E, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let saved = entity.with_id(id);
        self.rows.write().await.insert(id, saved.clone());
        debug!(id, "row inserted");
        Ok(saved)
    }

    async fn update(&self, entity: E) -> Result<Option<E>, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}
