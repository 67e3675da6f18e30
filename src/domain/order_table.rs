use uuid::Uuid;

use super::errors::DomainError;
use super::order::Order;

/// A physical table and the orders placed on it.
///
/// Occupancy is toggled elsewhere; this type only uses it to decide whether
/// a new order may be accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTable {
    id: Uuid,
    number_of_guests: u32,
    empty: bool,
    orders: Vec<Order>,
}

impl OrderTable {
    pub fn new(id: Uuid, number_of_guests: u32, empty: bool, orders: Vec<Order>) -> Self {
        Self {
            id,
            number_of_guests,
            empty,
            orders,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn number_of_guests(&self) -> u32 {
        self.number_of_guests
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Append `order` to this table and return it for persisting.
    pub fn add_order(&mut self, mut order: Order) -> Result<&mut Order, DomainError> {
        if self.empty {
            return Err(DomainError::OrderTableEmpty);
        }
        order.assign_table(self.id);
        self.orders.push(order);
        let last = self.orders.len() - 1;
        Ok(&mut self.orders[last])
    }
}
