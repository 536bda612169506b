//! Order entity and related types.

mod entity;
mod status;
mod value_objects;

pub use entity::Order;
pub use status::OrderStatus;
pub use value_objects::{Money, ProductId};

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested status change is not in the transition table.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The requested status string does not name a known status.
    #[error("unknown order status: {0:?}")]
    UnknownStatus(String),

    /// The order has left Pending and can no longer be edited or deleted.
    #[error("order is {status} and cannot be {action}")]
    ImmutableOrder {
        status: OrderStatus,
        action: &'static str,
    },

    /// An order must contain at least one line item.
    #[error("order must contain at least one line item")]
    EmptyOrder,

    /// Total price must be non-negative.
    #[error("total price cannot be negative: {cents} cents")]
    NegativePrice { cents: i64 },
}
