//! Lifecycle error types.

use common::OrderId;
use domain::{OrderError, OrderStatus, ProductId};
use store::StoreError;
use thiserror::Error;

use crate::inventory::InventoryUnavailable;

/// Errors surfaced by the order lifecycle service.
///
/// Business rejections carry enough structure to explain "why" to the
/// caller; infrastructure failures (`InventoryUnavailable`, `Store`) are
/// kept distinct so a client can decide to retry the whole operation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// No order exists with the given id.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// The inventory service does not know the product.
    #[error("product not found in inventory: {0}")]
    ProductNotFound(ProductId),

    /// Available stock does not cover the required units.
    #[error(
        "insufficient stock for product {product_id}: required {required}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        required: u32,
        available: u32,
    },

    /// The inventory call itself failed (network, timeout), as opposed
    /// to a business rejection.
    #[error("inventory service unavailable: {0}")]
    InventoryUnavailable(String),

    /// The order's status change was durably persisted, but the
    /// follow-up stock mutation failed. Order and stock now disagree
    /// with what the status implies, until an operator or a separate
    /// reconciliation sweep corrects the drift.
    #[error("order {order_id} committed as {status} but stock was not adjusted: {source}")]
    ReconciliationFailed {
        order_id: OrderId,
        status: OrderStatus,
        source: Box<LifecycleError>,
    },

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The order store failed.
    #[error("order store error: {0}")]
    Store(#[from] StoreError),
}

impl From<InventoryUnavailable> for LifecycleError {
    fn from(e: InventoryUnavailable) -> Self {
        LifecycleError::InventoryUnavailable(e.0)
    }
}

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
