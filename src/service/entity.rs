//! Entity Service
//!
//! Orchestrates validator, cache and store behind one CRUD + bulk contract.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::{CacheSettings, CacheStats, EntityCache};
use crate::error::{Result, ServiceError, StoreError};
use crate::models::Entity;
use crate::notifications::{Notification, Notifier};
use crate::service::{ImportPolicy, ImportReport};
use crate::store::EntityStore;
use crate::transfer::{ExportSink, ImportSource};
use crate::validator::Validator;

// == Entity Service ==
/// Read-through cached service over an [`EntityStore`].
///
/// Reads by id are served from the cache when fresh and populate it on a
/// store hit, unless a write to the same id landed while the read was in
/// flight. Writes invalidate the cached entry before touching the store
/// and re-cache the stored result afterwards. The store stays the only
/// source of truth.
pub struct EntityService<E, S, V> {
    store: Arc<S>,
    validator: V,
    cache: EntityCache<i64, E>,
    notifier: Arc<Notifier<E>>,
    import_policy: ImportPolicy,
}

impl<E, S, V> EntityService<E, S, V>
where
    E: Entity,
    S: EntityStore<E> + 'static,
    V: Validator<E>,
{
    // == Constructor ==
    pub fn new(store: Arc<S>, validator: V, settings: CacheSettings) -> Self {
        info!(
            ttl_secs = settings.ttl.as_secs(),
            max_entries = settings.max_entries,
            "Initializing entity service cache"
        );
        Self {
            store,
            validator,
            cache: EntityCache::new(settings),
            notifier: Arc::new(Notifier::new()),
            import_policy: ImportPolicy::default(),
        }
    }

    /// Sets the bulk import policy for this service instance.
    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    pub fn import_policy(&self) -> ImportPolicy {
        self.import_policy
    }

    /// Shared handle to the service's cache, for maintenance tasks.
    pub fn cache(&self) -> &EntityCache<i64, E> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Subscribes to create/update/delete notifications (latest value only).
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification<E>>> {
        self.notifier.subscribe()
    }

    // == Find All ==
    /// Returns every entity straight from the store; the cache is not consulted.
    pub async fn find_all(&self) -> Result<Vec<E>> {
        info!("Finding all entities");
        Ok(self.store.find_all().await?)
    }

    // == Find By Id ==
    pub async fn find_by_id(&self, id: i64) -> Result<E> {
        if let Some(cached) = self.cache.get(&id) {
            debug!(id, "Cache hit");
            return Ok(cached);
        }

        debug!(id, "Cache miss, reading store");
        let ticket = self.cache.begin_fill();
        match self.store.find_by_id(id).await? {
            Some(entity) => {
                if !ticket.fill(id, entity.clone()) {
                    debug!(id, "Write overtook read, not caching");
                }
                Ok(entity)
            }
            None => {
                warn!(id, "Entity not found");
                Err(ServiceError::not_found(id))
            }
        }
    }

    // == Create ==
    /// Validates and saves a new entity; the store assigns its id.
    pub async fn create(&self, candidate: E) -> Result<E> {
        self.check(&candidate)?;

        let store = Arc::clone(&self.store);
        let cache = self.cache.clone();
        let notifier = Arc::clone(&self.notifier);

        let saved = run_to_completion(async move {
            let saved = store.save(candidate).await?;
            cache.put(saved.id(), saved.clone());
            notifier.publish(Notification::created(saved.id(), saved.clone()));
            Ok::<_, ServiceError>(saved)
        })
        .await?;

        info!(id = saved.id(), "Entity created");
        Ok(saved)
    }

    // == Update ==
    pub async fn update(&self, candidate: E) -> Result<E> {
        self.check(&candidate)?;

        let id = candidate.id();
        self.cache.invalidate(&id);

        let store = Arc::clone(&self.store);
        let cache = self.cache.clone();
        let notifier = Arc::clone(&self.notifier);

        let updated = run_to_completion(async move {
            let updated = store
                .update(candidate)
                .await?
                .ok_or_else(|| ServiceError::not_found(id))?;
            cache.put(id, updated.clone());
            notifier.publish(Notification::updated(id, updated.clone()));
            Ok::<_, ServiceError>(updated)
        })
        .await
        .inspect_err(|e| warn!(id, error = %e, "Update failed"))?;

        info!(id, "Entity updated");
        Ok(updated)
    }

    // == Delete ==
    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.cache.invalidate(&id);

        let store = Arc::clone(&self.store);
        let cache = self.cache.clone();
        let notifier = Arc::clone(&self.notifier);

        run_to_completion(async move {
            if !store.delete(id).await? {
                return Err(ServiceError::not_found(id));
            }
            // Drops anything a read fetched before the delete committed
            cache.invalidate(&id);
            notifier.publish(Notification::deleted(id));
            Ok::<_, ServiceError>(())
        })
        .await
        .inspect_err(|e| warn!(id, error = %e, "Delete failed"))?;

        info!(id, "Entity deleted");
        Ok(true)
    }

    // == Import ==
    /// Loads candidates from `source` and creates each of them according to
    /// the configured [`ImportPolicy`].
    pub async fn import<Src>(&self, source: &Src) -> Result<ImportReport>
    where
        Src: ImportSource<E> + ?Sized,
    {
        let candidates = source.load().await?;
        info!(
            count = candidates.len(),
            policy = %self.import_policy,
            "Starting bulk import"
        );

        let report = match self.import_policy {
            ImportPolicy::FailFast => {
                let mut report = ImportReport::default();
                for candidate in candidates {
                    self.create(candidate)
                        .await
                        .inspect_err(|e| warn!(imported = report.imported, error = %e, "Import aborted"))?;
                    report.imported += 1;
                }
                report
            }
            ImportPolicy::BestEffort => {
                let outcomes = join_all(candidates.into_iter().map(|c| self.create(c))).await;
                let mut report = ImportReport::default();
                for outcome in outcomes {
                    match outcome {
                        Ok(_) => report.imported += 1,
                        Err(e) => {
                            warn!(error = %e, "Skipping entity during import");
                            report.skipped += 1;
                        }
                    }
                }
                report
            }
        };

        info!(imported = report.imported, skipped = report.skipped, "Bulk import finished");
        Ok(report)
    }

    // == Export ==
    /// Hands every stored entity to `sink`. Returns the number written.
    pub async fn export<Snk>(&self, sink: &Snk) -> Result<usize>
    where
        Snk: ExportSink<E> + ?Sized,
    {
        let entities = self.store.find_all().await?;
        let written = sink.write(&entities).await?;
        info!(written, "Bulk export finished");
        Ok(written)
    }

    fn check(&self, candidate: &E) -> Result<()> {
        self.validator.validate(candidate).map_err(|reason| {
            warn!(id = candidate.id(), %reason, "Validation failed");
            ServiceError::Validation(reason)
        })
    }
}

/// Drives a store write and its cache/notification follow-up on its own task,
/// so a caller that stops waiting cannot split a committed write from its
/// cache update.
async fn run_to_completion<T, F>(write: F) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    tokio::spawn(write).await.map_err(|e| {
        ServiceError::Storage(StoreError::Unavailable(format!("write task failed: {e}")))
    })?
}
