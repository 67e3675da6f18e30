pub mod errors;
pub mod order;
pub mod order_table;
pub mod ports;
