use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Cooking,
    Meal,
    Completion,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Cooking => "COOKING",
            OrderStatus::Meal => "MEAL",
            OrderStatus::Completion => "COMPLETION",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COOKING" => Ok(OrderStatus::Cooking),
            "MEAL" => Ok(OrderStatus::Meal),
            "COMPLETION" => Ok(OrderStatus::Completion),
            other => Err(DomainError::InvalidOrderStatus(other.to_string())),
        }
    }
}

/// One requested line of a new order, before it becomes part of an [`Order`].
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub menu_id: Uuid,
    pub quantity: NonZeroU32,
}

impl From<OrderLineInput> for OrderLineItem {
    fn from(input: OrderLineInput) -> Self {
        OrderLineItem::new(input.menu_id, input.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineItem {
    menu_id: Uuid,
    quantity: NonZeroU32,
}

impl OrderLineItem {
    pub fn new(menu_id: Uuid, quantity: NonZeroU32) -> Self {
        Self { menu_id, quantity }
    }

    pub fn menu_id(&self) -> Uuid {
        self.menu_id
    }

    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }
}

/// Order aggregate root.
///
/// Line items and the ordered time are fixed once the order exists; the
/// status is the only thing that changes afterwards, and only through
/// [`Order::change_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Option<Uuid>,
    order_table_id: Uuid,
    status: OrderStatus,
    ordered_time: DateTime<Utc>,
    line_items: Vec<OrderLineItem>,
}

impl Order {
    /// A fresh, unsaved order in `COOKING`.
    pub fn new(
        order_table_id: Uuid,
        ordered_time: DateTime<Utc>,
        line_items: Vec<OrderLineItem>,
    ) -> Result<Self, DomainError> {
        Self::from_parts(
            None,
            order_table_id,
            OrderStatus::Cooking,
            ordered_time,
            line_items,
        )
    }

    /// Rebuild an order from stored state.
    pub fn from_parts(
        id: Option<Uuid>,
        order_table_id: Uuid,
        status: OrderStatus,
        ordered_time: DateTime<Utc>,
        line_items: Vec<OrderLineItem>,
    ) -> Result<Self, DomainError> {
        if line_items.is_empty() {
            return Err(DomainError::OrderItemEmpty);
        }
        Ok(Self {
            id,
            order_table_id,
            status,
            ordered_time,
            line_items,
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn order_table_id(&self) -> Uuid {
        self.order_table_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn ordered_time(&self) -> DateTime<Utc> {
        self.ordered_time
    }

    pub fn line_items(&self) -> &[OrderLineItem] {
        &self.line_items
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completion
    }

    /// Move to `status`. Only `COMPLETION` is terminal; any other
    /// transition is applied as requested.
    pub fn change_status(&mut self, status: OrderStatus) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::OrderStatusAlreadyCompleted);
        }
        self.status = status;
        Ok(())
    }

    pub(crate) fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    pub(crate) fn assign_table(&mut self, order_table_id: Uuid) {
        self.order_table_id = order_table_id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineItemView {
    pub menu_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub id: Uuid,
    pub order_table_id: Uuid,
    pub order_status: OrderStatus,
    pub ordered_time: DateTime<Utc>,
    pub order_line_items: Vec<OrderLineItemView>,
}

impl TryFrom<&Order> for OrderView {
    type Error = DomainError;

    fn try_from(order: &Order) -> Result<Self, Self::Error> {
        let id = order
            .id()
            .ok_or_else(|| DomainError::Internal("order has not been persisted".to_string()))?;
        Ok(OrderView {
            id,
            order_table_id: order.order_table_id(),
            order_status: order.status(),
            ordered_time: order.ordered_time(),
            order_line_items: order
                .line_items()
                .iter()
                .map(|item| OrderLineItemView {
                    menu_id: item.menu_id(),
                    quantity: item.quantity().get(),
                })
                .collect(),
        })
    }
}
