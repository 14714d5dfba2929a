//! Entity Store Module
//!
//! The authoritative persistence contract consumed by the service, and an
//! in-memory implementation of it.

mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Entity;

pub use memory::MemoryStore;

// == Entity Store ==
/// Durable storage for entities of type `E`.
///
/// "Not found" is reported through `Option`/`bool`; `Err` is reserved for
/// failures of the backend itself.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Returns every stored entity, ordered by id.
    async fn find_all(&self) -> Result<Vec<E>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, StoreError>;

    /// Persists a new entity and returns it with its assigned id.
    async fn save(&self, entity: E) -> Result<E, StoreError>;

    /// Replaces the stored entity with the same id. `None` when absent.
    async fn update(&self, entity: E) -> Result<Option<E>, StoreError>;

    /// Removes the entity. `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
