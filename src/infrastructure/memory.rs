//! In-memory store backing the unit and HTTP tests.
//!
//! Every transaction works on a copy of the state that replaces the
//! committed state only when the work succeeds, and the mutex serializes
//! transactions against each other.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::order_table::OrderTable;
use crate::domain::ports::{OrderRepository, OrderTableRepository, Transaction, UnitOfWork};

#[derive(Debug, Clone, Copy)]
struct TableRecord {
    number_of_guests: u32,
    empty: bool,
}

#[derive(Debug, Clone, Default)]
struct State {
    menus: HashSet<Uuid>,
    tables: HashMap<Uuid, TableRecord>,
    orders: Vec<Order>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a menu id so line items may reference it.
    pub fn add_menu(&self) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.lock()?.menus.insert(id);
        Ok(id)
    }

    pub fn add_table(&self, number_of_guests: u32, empty: bool) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.lock()?.tables.insert(
            id,
            TableRecord {
                number_of_guests,
                empty,
            },
        );
        Ok(id)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

impl UnitOfWork for InMemoryStore {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>,
    {
        let mut committed = self.lock()?;
        let mut working = committed.clone();
        let result = work(&mut MemoryTransaction {
            state: &mut working,
        })?;
        *committed = working;
        Ok(result)
    }
}

struct MemoryTransaction<'s> {
    state: &'s mut State,
}

impl Transaction for MemoryTransaction<'_> {
    fn tables(&mut self) -> &mut dyn OrderTableRepository {
        self
    }

    fn orders(&mut self) -> &mut dyn OrderRepository {
        self
    }
}

impl OrderTableRepository for MemoryTransaction<'_> {
    fn find_by_id(&mut self, id: Uuid) -> Result<Option<OrderTable>, DomainError> {
        let Some(record) = self.state.tables.get(&id) else {
            return Ok(None);
        };
        let orders = self
            .state
            .orders
            .iter()
            .filter(|o| o.order_table_id() == id)
            .cloned()
            .collect();
        Ok(Some(OrderTable::new(
            id,
            record.number_of_guests,
            record.empty,
            orders,
        )))
    }
}

impl OrderRepository for MemoryTransaction<'_> {
    fn find_by_id(&mut self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self
            .state
            .orders
            .iter()
            .find(|o| o.id() == Some(id))
            .cloned())
    }

    fn find_by_id_for_update(&mut self, id: Uuid) -> Result<Option<Order>, DomainError> {
        // The store mutex already serializes whole transactions.
        OrderRepository::find_by_id(self, id)
    }

    fn save(&mut self, order: &mut Order) -> Result<(), DomainError> {
        if let Some(id) = order.id() {
            let stored = self
                .state
                .orders
                .iter_mut()
                .find(|o| o.id() == Some(id))
                .ok_or(DomainError::OrderNotFound)?;
            *stored = order.clone();
            return Ok(());
        }

        if !self.state.tables.contains_key(&order.order_table_id()) {
            return Err(DomainError::TableNotFound);
        }
        if let Some(item) = order
            .line_items()
            .iter()
            .find(|item| !self.state.menus.contains(&item.menu_id()))
        {
            return Err(DomainError::MenuReference(format!(
                "menu {} does not exist",
                item.menu_id()
            )));
        }

        order.assign_id(Uuid::new_v4());
        self.state.orders.push(order.clone());
        Ok(())
    }

    fn find_all(&mut self) -> Result<Vec<Order>, DomainError> {
        Ok(self.state.orders.clone())
    }
}
