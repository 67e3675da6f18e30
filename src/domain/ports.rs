use uuid::Uuid;

use super::errors::DomainError;
use super::order::Order;
use super::order_table::OrderTable;

pub trait OrderTableRepository {
    /// Load a table together with the orders already placed on it.
    fn find_by_id(&mut self, id: Uuid) -> Result<Option<OrderTable>, DomainError>;
}

pub trait OrderRepository {
    fn find_by_id(&mut self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Like `find_by_id`, but concurrent writers to the same order wait until
    /// the current transaction ends.
    fn find_by_id_for_update(&mut self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Insert an unsaved order (assigning its id) or persist the status of
    /// an existing one.
    fn save(&mut self, order: &mut Order) -> Result<(), DomainError>;
    fn find_all(&mut self) -> Result<Vec<Order>, DomainError>;
}

/// Repositories bound to one open transaction.
pub trait Transaction {
    fn tables(&mut self) -> &mut dyn OrderTableRepository;
    fn orders(&mut self) -> &mut dyn OrderRepository;
}

pub trait UnitOfWork: Send + Sync + 'static {
    /// Run `work` atomically. Nothing it wrote survives if it returns `Err`.
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>;
}
