use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLineInput, OrderLineItem, OrderStatus, OrderView};
use crate::domain::ports::UnitOfWork;

pub struct OrderService<S> {
    store: S,
}

impl<S: UnitOfWork> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Place a new order on an occupied table.
    ///
    /// Checks run in a fixed order: the table must exist, the order must
    /// have line items, the table must be occupied. Menu references are
    /// checked last, by the store.
    pub fn create(
        &self,
        order_table_id: Uuid,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError> {
        let view = self.store.transaction(|tx| {
            let mut table = tx
                .tables()
                .find_by_id(order_table_id)?
                .ok_or(DomainError::TableNotFound)?;

            let line_items = lines.into_iter().map(OrderLineItem::from).collect();
            let order = Order::new(table.id(), Utc::now(), line_items)?;
            let order = table.add_order(order)?;
            tx.orders().save(order)?;

            OrderView::try_from(&*order)
        });

        match &view {
            Ok(order) => log::info!(
                "Created order {} on table {} with {} line item(s)",
                order.id,
                order.order_table_id,
                order.order_line_items.len()
            ),
            Err(e) => log::warn!("Rejected order for table {}: {}", order_table_id, e),
        }
        view
    }

    pub fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        self.store.transaction(|tx| {
            let orders = tx.orders().find_all()?;
            orders.iter().map(OrderView::try_from).collect()
        })
    }

    pub fn get(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        self.store.transaction(|tx| {
            let order = tx
                .orders()
                .find_by_id(order_id)?
                .ok_or(DomainError::OrderNotFound)?;
            OrderView::try_from(&order)
        })
    }

    /// Apply the status named by `status` (e.g. `"MEAL"`) to an order.
    pub fn change_order_status(
        &self,
        order_id: Uuid,
        status: &str,
    ) -> Result<OrderView, DomainError> {
        let view = self.store.transaction(|tx| {
            let mut order = tx
                .orders()
                .find_by_id_for_update(order_id)?
                .ok_or(DomainError::OrderNotFound)?;
            let status: OrderStatus = status.parse()?;

            order.change_status(status)?;
            tx.orders().save(&mut order)?;

            OrderView::try_from(&order)
        });

        match &view {
            Ok(order) => log::info!("Order {} is now {}", order.id, order.order_status),
            Err(e) => log::warn!("Rejected status change for order {}: {}", order_id, e),
        }
        view
    }
}
