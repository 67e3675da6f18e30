use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order table not found")]
    TableNotFound,
    #[error("Order not found")]
    OrderNotFound,
    #[error("Order must contain at least one line item")]
    OrderItemEmpty,
    #[error("Orders cannot be placed on an empty table")]
    OrderTableEmpty,
    #[error("Unknown order status: {0}")]
    InvalidOrderStatus(String),
    #[error("Order is already completed")]
    OrderStatusAlreadyCompleted,
    /// A line item points at a menu the store does not know about.
    #[error("Data integrity violation: {0}")]
    MenuReference(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable code handed to callers alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::TableNotFound => "TABLE_NOT_FOUND_ERROR",
            DomainError::OrderNotFound => "ORDER_NOT_FOUND_ERROR",
            DomainError::OrderItemEmpty => "ORDER_ITEM_EMPTY_ERROR",
            DomainError::OrderTableEmpty => "ORDER_TABLE_EMPTY_ERROR",
            DomainError::InvalidOrderStatus(_) => "INVALID_ORDER_STATUS_ERROR",
            DomainError::OrderStatusAlreadyCompleted => "ORDER_STATUS_ALREADY_COMPLETED_ERROR",
            DomainError::MenuReference(_) => "DATA_INTEGRITY_ERROR",
            DomainError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
