//! Use-case container: one [`EntityUseCases`] per entity, wired to the
//! configured providers.

use espyna_core::entity::Entity;
use espyna_core::transaction::TransactionRunner;
use espyna_core::usecase::EntityUseCases;
use espyna_db::models::{Client, Payment, Product, Subscription, Workflow};
use espyna_db::{Providers, RepositoryFor};

pub struct Services {
    pub clients: EntityUseCases<Client>,
    pub products: EntityUseCases<Product>,
    pub subscriptions: EntityUseCases<Subscription>,
    pub payments: EntityUseCases<Payment>,
    pub workflows: EntityUseCases<Workflow>,
}

impl Services {
    pub fn new(providers: &Providers, max_attempts: u32) -> Self {
        let runner = TransactionRunner::new(providers.database.transactions())
            .with_max_attempts(max_attempts);

        Self {
            clients: use_cases(providers, &runner),
            products: use_cases(providers, &runner),
            subscriptions: use_cases(providers, &runner),
            payments: use_cases(providers, &runner),
            workflows: use_cases(providers, &runner),
        }
    }
}

fn use_cases<E>(providers: &Providers, runner: &TransactionRunner) -> EntityUseCases<E>
where
    E: Entity,
    espyna_db::Repositories: RepositoryFor<E>,
{
    let repository = RepositoryFor::<E>::repository(providers.database.repositories());
    EntityUseCases::new(repository, providers.authorizer.clone(), runner.clone())
}

/// Typed access to the use cases for `E`, for generic handlers.
pub trait UseCasesFor<E: Entity> {
    fn use_cases(&self) -> &EntityUseCases<E>;
}

macro_rules! use_cases_for {
    ($($entity:ty => $field:ident),+ $(,)?) => {
        $(
            impl UseCasesFor<$entity> for Services {
                fn use_cases(&self) -> &EntityUseCases<$entity> {
                    &self.$field
                }
            }
        )+
    };
}

use_cases_for! {
    Client => clients,
    Product => products,
    Subscription => subscriptions,
    Payment => payments,
    Workflow => workflows,
}
