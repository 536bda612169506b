//! The order entity.

use chrono::{DateTime, Utc};
use common::{OrderId, OwnerId};
use serde::{Deserialize, Serialize};

use super::{Money, OrderError, OrderStatus, ProductId};

/// An order owned by a single principal.
///
/// Line items are an ordered sequence of product ids; a repeated id means
/// one more unit of that product. The id is `None` until the store
/// persists the order for the first time, and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: Option<OrderId>,
    owner_id: OwnerId,
    line_items: Vec<ProductId>,
    status: OrderStatus,
    total_price: Money,
    created_date: DateTime<Utc>,
}

impl Order {
    /// Creates a new Pending order.
    ///
    /// Fails with `EmptyOrder` if `line_items` is empty and with
    /// `NegativePrice` if the total is below zero.
    pub fn new(
        owner_id: OwnerId,
        line_items: Vec<ProductId>,
        total_price: Money,
    ) -> Result<Self, OrderError> {
        if line_items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if total_price.is_negative() {
            return Err(OrderError::NegativePrice {
                cents: total_price.cents(),
            });
        }

        Ok(Self {
            id: None,
            owner_id,
            line_items,
            status: OrderStatus::Pending,
            total_price,
            created_date: Utc::now(),
        })
    }

    /// Attaches the id assigned by the store. Called once, on first save.
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the order id, or `None` if the order was never saved.
    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    /// Returns the owning principal's id.
    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the line items in insertion order.
    pub fn line_items(&self) -> &[ProductId] {
        &self.line_items
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the total price.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the creation timestamp.
    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    /// Moves the order to `requested` if the transition table allows it.
    pub fn transition_to(&mut self, requested: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(requested) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: requested,
            });
        }
        self.status = requested;
        Ok(())
    }

    /// Replaces line items and total price. Only legal while Pending.
    pub fn set_line_items(
        &mut self,
        line_items: Vec<ProductId>,
        total_price: Money,
    ) -> Result<(), OrderError> {
        if !self.status.can_modify() {
            return Err(OrderError::ImmutableOrder {
                status: self.status,
                action: "updated",
            });
        }
        if line_items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if total_price.is_negative() {
            return Err(OrderError::NegativePrice {
                cents: total_price.cents(),
            });
        }

        self.line_items = line_items;
        self.total_price = total_price;
        Ok(())
    }
}
