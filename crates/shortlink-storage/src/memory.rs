use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shortlink_core::{Alias, MappingStore, ReadStore, Result, StoreError, Target, UrlRecord};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// In-memory storage slot for a mapping.
#[derive(Debug, Clone)]
struct Slot {
    id: i64,
    target: String,
}

impl Slot {
    fn into_record(self, alias: Alias) -> UrlRecord {
        UrlRecord {
            id: self.id,
            alias,
            target: self.target,
        }
    }
}

/// In-memory implementation of [`MappingStore`] using DashMap.
///
/// Clones share the same underlying map. Inserts go through
/// [`DashMap::entry`], so the duplicate check and the insert happen under a
/// single shard lock.
#[derive(Debug, Clone)]
pub struct InMemoryMappingStore {
    storage: Arc<DashMap<Alias, Slot>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryMappingStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Arc::new(DashMap::with_capacity(capacity)),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryMappingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadStore for InMemoryMappingStore {
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>> {
        trace!(alias = %alias, "looking up alias");

        Ok(self
            .storage
            .get(alias)
            .map(|slot| slot.value().clone().into_record(alias.clone())))
    }

    async fn exists(&self, alias: &Alias) -> Result<bool> {
        Ok(self.storage.contains_key(alias))
    }

    async fn list(&self) -> Result<Vec<UrlRecord>> {
        let mut records: Vec<UrlRecord> = self
            .storage
            .iter()
            .map(|entry| entry.value().clone().into_record(entry.key().clone()))
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, alias: &Alias, target: &Target) -> Result<i64> {
        match self.storage.entry(alias.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateAlias(alias.to_string())),
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                vacant.insert(Slot {
                    id,
                    target: target.as_str().to_owned(),
                });
                debug!(alias = %alias, id, "stored mapping");
                Ok(id)
            }
        }
    }

    async fn delete(&self, alias: &Alias) -> Result<bool> {
        Ok(self.storage.remove(alias).is_some())
    }
}
