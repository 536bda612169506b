//! Domain layer for the order lifecycle system.
//!
//! This crate provides:
//! - The `Order` entity with status-guarded mutation
//! - The `OrderStatus` state machine
//! - Quantity aggregation over line items

pub mod order;
pub mod quantity;

pub use order::{Money, Order, OrderError, OrderStatus, ProductId};
pub use quantity::required_units;
