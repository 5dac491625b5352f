//! In-memory repository backing the `mock` database provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use espyna_core::entity::Entity;
use espyna_core::repository::{Repository, RepositoryError};
use espyna_core::types::EntityId;
use tokio::sync::RwLock;

use crate::transaction::{Checkpoint, Checkpointed};

/// Stored record plus its insertion sequence, used for oldest-first listing.
#[derive(Debug, Clone)]
struct Row<E> {
    seq: u64,
    entity: E,
}

type Rows<E> = Arc<RwLock<HashMap<EntityId, Row<E>>>>;

/// A `HashMap` keyed by id behind a `tokio` read/write lock.
#[derive(Debug)]
pub struct MemoryRepository<E: Entity> {
    rows: Rows<E>,
    next_seq: AtomicU64,
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, inactive included.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn create(&self, entity: E) -> Result<E, RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(entity.id()) {
            return Err(RepositoryError::Duplicate {
                entity: E::KIND,
                id: entity.id().to_string(),
            });
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        rows.insert(
            entity.id().to_string(),
            Row {
                seq,
                entity: entity.clone(),
            },
        );
        tracing::trace!(entity = E::KIND, id = %entity.id(), "Stored in memory");
        Ok(entity)
    }

    async fn read(&self, id: &str) -> Result<Option<E>, RepositoryError> {
        Ok(self.rows.read().await.get(id).map(|row| row.entity.clone()))
    }

    async fn update(&self, mut entity: E) -> Result<Option<E>, RepositoryError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(entity.id()) {
            Some(row) => {
                entity.set_active(row.entity.is_active());
                if let Some(created) = row.entity.date_created() {
                    entity.set_date_created(created);
                }
                row.entity = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn soft_delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(id) {
            Some(row) => {
                row.entity.set_active(false);
                row.entity.set_date_modified(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<E>, RepositoryError> {
        let rows = self.rows.read().await;
        let mut selected: Vec<&Row<E>> = rows
            .values()
            .filter(|row| include_inactive || row.entity.is_active())
            .collect();
        selected.sort_by_key(|row| row.seq);
        Ok(selected.into_iter().map(|row| row.entity.clone()).collect())
    }
}

/// The full row map as it was when the transaction began.
struct RowsCheckpoint<E: Entity> {
    rows: Rows<E>,
    saved: HashMap<EntityId, Row<E>>,
}

#[async_trait]
impl<E: Entity> Checkpointed for MemoryRepository<E> {
    async fn checkpoint(&self) -> Box<dyn Checkpoint> {
        let saved = self.rows.read().await.clone();
        Box::new(RowsCheckpoint {
            rows: Arc::clone(&self.rows),
            saved,
        })
    }
}

#[async_trait]
impl<E: Entity> Checkpoint for RowsCheckpoint<E> {
    async fn restore(self: Box<Self>) {
        let RowsCheckpoint { rows, saved } = *self;
        let restored = saved.len();
        *rows.write().await = saved;
        tracing::trace!(entity = E::KIND, rows = restored, "Restored memory checkpoint");
    }
}
