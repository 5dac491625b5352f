//! Transaction service for the in-memory provider.
//!
//! Memory writes are applied immediately. `begin` checkpoints every tracked
//! store and a rollback or failed commit restores those checkpoints, so an
//! aborted attempt leaves nothing behind. Transactions run one at a time.
//! Commit failures can be scripted to exercise the retry path of
//! [`TransactionRunner`](espyna_core::transaction::TransactionRunner).

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use espyna_core::transaction::{
    Transaction, TransactionError, TransactionErrorKind, TransactionService,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A store whose contents can be saved when a transaction begins.
#[async_trait]
pub trait Checkpointed: Send + Sync {
    async fn checkpoint(&self) -> Box<dyn Checkpoint>;
}

/// Saved contents of one [`Checkpointed`] store.
#[async_trait]
pub trait Checkpoint: Send {
    /// Put the store back the way it was when the checkpoint was taken.
    async fn restore(self: Box<Self>);
}

#[derive(Debug, Default)]
struct Counters {
    begins: AtomicU32,
    commits: AtomicU32,
    rollbacks: AtomicU32,
}

#[derive(Clone)]
pub struct MockTransactionService {
    transactional: bool,
    counters: Arc<Counters>,
    commit_failures: Arc<Mutex<VecDeque<TransactionErrorKind>>>,
    stores: Vec<Arc<dyn Checkpointed>>,
    gate: Arc<Mutex<()>>,
}

impl fmt::Debug for MockTransactionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransactionService")
            .field("transactional", &self.transactional)
            .field("counters", &self.counters)
            .field("stores", &self.stores.len())
            .finish_non_exhaustive()
    }
}

impl Default for MockTransactionService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransactionService {
    pub fn new() -> Self {
        Self {
            transactional: true,
            counters: Arc::new(Counters::default()),
            commit_failures: Arc::new(Mutex::new(VecDeque::new())),
            stores: Vec::new(),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Checkpoint `store` on every `begin` and restore it on rollback.
    pub fn tracking(mut self, store: Arc<dyn Checkpointed>) -> Self {
        self.stores.push(store);
        self
    }

    /// A service that reports no transaction support; callbacks run directly.
    pub fn non_transactional() -> Self {
        Self {
            transactional: false,
            ..Self::new()
        }
    }

    /// Make the next commit fail with `kind`. Calls queue up in order.
    pub async fn fail_next_commit(&self, kind: TransactionErrorKind) {
        self.commit_failures.lock().await.push_back(kind);
    }

    pub fn begins(&self) -> u32 {
        self.counters.begins.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> u32 {
        self.counters.commits.load(Ordering::SeqCst)
    }

    /// Explicit rollbacks plus commits that failed and were undone.
    pub fn rollbacks(&self) -> u32 {
        self.counters.rollbacks.load(Ordering::SeqCst)
    }
}

struct MockTransaction {
    counters: Arc<Counters>,
    commit_failures: Arc<Mutex<VecDeque<TransactionErrorKind>>>,
    checkpoints: Vec<Box<dyn Checkpoint>>,
    _gate: OwnedMutexGuard<()>,
}

impl MockTransaction {
    async fn undo(self) {
        for checkpoint in self.checkpoints {
            checkpoint.restore().await;
        }
        self.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(self: Box<Self>) -> Result<(), TransactionError> {
        self.counters.commits.fetch_add(1, Ordering::SeqCst);
        let failure = self.commit_failures.lock().await.pop_front();
        match failure {
            Some(kind) => {
                tracing::debug!(%kind, "Scripted commit failure, restoring checkpoints");
                (*self).undo().await;
                Err(TransactionError::new(kind, "scripted commit failure"))
            }
            None => Ok(()),
        }
    }

    async fn rollback(self: Box<Self>) -> Result<(), TransactionError> {
        (*self).undo().await;
        Ok(())
    }
}

#[async_trait]
impl TransactionService for MockTransactionService {
    fn supports_transactions(&self) -> bool {
        self.transactional
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>, TransactionError> {
        if !self.transactional {
            return Err(TransactionError::new(
                TransactionErrorKind::NotSupported,
                "transactions are disabled for this provider",
            ));
        }
        let gate = Arc::clone(&self.gate).lock_owned().await;
        let mut checkpoints = Vec::with_capacity(self.stores.len());
        for store in &self.stores {
            checkpoints.push(store.checkpoint().await);
        }
        self.counters.begins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockTransaction {
            counters: Arc::clone(&self.counters),
            commit_failures: Arc::clone(&self.commit_failures),
            checkpoints,
            _gate: gate,
        }))
    }
}
