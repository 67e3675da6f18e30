pub mod memory;
pub mod models;
pub mod order_repo;

pub use memory::InMemoryStore;
pub use order_repo::DieselStore;

use crate::domain::errors::DomainError;
use crate::domain::ports::{Transaction, UnitOfWork};

/// The store behind the HTTP layer: Postgres when served, memory in tests.
pub enum Store {
    Postgres(DieselStore),
    Memory(InMemoryStore),
}

impl UnitOfWork for Store {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>,
    {
        match self {
            Store::Postgres(store) => store.transaction(work),
            Store::Memory(store) => store.transaction(work),
        }
    }
}
