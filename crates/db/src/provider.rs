//! Database provider port and the repository factory it exposes.

use std::sync::Arc;

use async_trait::async_trait;
use espyna_core::entity::Entity;
use espyna_core::repository::{Repository, RepositoryError};
use espyna_core::transaction::TransactionService;

use crate::models::{Client, Payment, Product, Subscription, Workflow};

/// One repository per entity, as produced by a database provider.
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn Repository<Client>>,
    pub products: Arc<dyn Repository<Product>>,
    pub subscriptions: Arc<dyn Repository<Subscription>>,
    pub payments: Arc<dyn Repository<Payment>>,
    pub workflows: Arc<dyn Repository<Workflow>>,
}

/// Typed access to the repository for `E`, for code generic over entities.
pub trait RepositoryFor<E: Entity> {
    fn repository(&self) -> Arc<dyn Repository<E>>;
}

macro_rules! repository_for {
    ($($entity:ty => $field:ident),+ $(,)?) => {
        $(
            impl RepositoryFor<$entity> for Repositories {
                fn repository(&self) -> Arc<dyn Repository<$entity>> {
                    Arc::clone(&self.$field)
                }
            }
        )+
    };
}

repository_for! {
    Client => clients,
    Product => products,
    Subscription => subscriptions,
    Payment => payments,
    Workflow => workflows,
}

/// A storage backend selected by name through the provider registry.
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// Registry name, e.g. `"mock"`.
    fn name(&self) -> &'static str;

    fn repositories(&self) -> &Repositories;

    fn transactions(&self) -> Arc<dyn TransactionService>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

#[cfg(feature = "mock_db")]
pub use memory::MemoryDatabase;

#[cfg(feature = "mock_db")]
mod memory {
    use super::*;
    use crate::repositories::MemoryRepository;
    use crate::transaction::MockTransactionService;

    /// The `mock` provider: every repository lives in process memory.
    pub struct MemoryDatabase {
        repositories: Repositories,
        transactions: Arc<MockTransactionService>,
    }

    impl Default for MemoryDatabase {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MemoryDatabase {
        pub const NAME: &'static str = "mock";

        pub fn new() -> Self {
            Self::with_transactions(MockTransactionService::new())
        }

        /// Build the repositories and register each with `transactions`,
        /// so rolled-back work is undone.
        pub fn with_transactions(transactions: MockTransactionService) -> Self {
            let clients = Arc::new(MemoryRepository::<Client>::new());
            let products = Arc::new(MemoryRepository::<Product>::new());
            let subscriptions = Arc::new(MemoryRepository::<Subscription>::new());
            let payments = Arc::new(MemoryRepository::<Payment>::new());
            let workflows = Arc::new(MemoryRepository::<Workflow>::new());

            let transactions = transactions
                .tracking(clients.clone())
                .tracking(products.clone())
                .tracking(subscriptions.clone())
                .tracking(payments.clone())
                .tracking(workflows.clone());

            Self {
                repositories: Repositories {
                    clients,
                    products,
                    subscriptions,
                    payments,
                    workflows,
                },
                transactions: Arc::new(transactions),
            }
        }

        /// The concrete transaction service, for inspecting counters.
        pub fn mock_transactions(&self) -> &Arc<MockTransactionService> {
            &self.transactions
        }
    }

    #[async_trait]
    impl DatabaseProvider for MemoryDatabase {
        fn name(&self) -> &'static str {
            Self::NAME
        }

        fn repositories(&self) -> &Repositories {
            &self.repositories
        }

        fn transactions(&self) -> Arc<dyn TransactionService> {
            self.transactions.clone()
        }

        async fn health_check(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }
}
