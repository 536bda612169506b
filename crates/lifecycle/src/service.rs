//! Order lifecycle service: the façade over store, state machine and
//! inventory reconciliation.

use common::{OrderId, OwnerId};
use domain::{Money, Order, OrderError, OrderStatus, ProductId, required_units};
use store::OrderStore;

use crate::error::{LifecycleError, Result};
use crate::inventory::InventoryClient;
use crate::reconciler::{InventoryReconciler, ReconcilerConfig, StockDirection};

/// Coordinates the order record and remote stock across their lifecycle.
///
/// Every stock-affecting transition follows the same ordering: validate
/// availability, commit the order's status to the store, then mutate
/// stock. The status commit is never reverted if the follow-up mutation
/// fails; that case surfaces as `ReconciliationFailed`.
pub struct OrderLifecycleService<S, I> {
    store: S,
    reconciler: InventoryReconciler<I>,
}

impl<S, I> OrderLifecycleService<S, I>
where
    S: OrderStore,
    I: InventoryClient,
{
    /// Creates a new lifecycle service.
    pub fn new(store: S, inventory: I, config: ReconcilerConfig) -> Self {
        Self {
            store,
            reconciler: InventoryReconciler::new(inventory, config),
        }
    }

    /// Creates a new Pending order after validating availability.
    ///
    /// No stock is consumed here; reduction happens at confirmation.
    #[tracing::instrument(skip(self, line_items))]
    pub async fn create_order(
        &self,
        owner_id: OwnerId,
        line_items: Vec<ProductId>,
        total_price: Money,
    ) -> Result<Order> {
        let order = Order::new(owner_id, line_items, total_price)?;

        let required = required_units(order.line_items());
        self.reconciler.validate(&required).await?;

        let saved = self.store.save(order).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = ?saved.id(), %owner_id, "order created");
        Ok(saved)
    }

    /// Moves an order to the requested status and reconciles stock.
    ///
    /// Pending→Confirmed re-aggregates and re-validates from the
    /// order's *current* line items before reducing; Confirmed→Cancelled
    /// restores. The status change is persisted before the stock
    /// mutation runs; if the mutation then fails, the order is not
    /// rolled back and the call returns `ReconciliationFailed`.
    #[tracing::instrument(skip(self))]
    pub async fn transition_status(&self, order_id: OrderId, requested: &str) -> Result<Order> {
        let requested: OrderStatus = requested.parse::<OrderStatus>()?;

        let mut order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(LifecycleError::OrderNotFound(order_id))?;
        let current = order.status();

        let direction = match (current, requested) {
            (OrderStatus::Pending, OrderStatus::Confirmed) => Some(StockDirection::Reduce),
            (OrderStatus::Confirmed, OrderStatus::Cancelled) => Some(StockDirection::Restore),
            _ => None,
        };

        order.transition_to(requested)?;

        let required = required_units(order.line_items());
        if direction == Some(StockDirection::Reduce) {
            // Live re-read: stock may have shrunk since creation or the
            // last edit.
            self.reconciler.validate(&required).await?;
        }

        let saved = self.store.save(order).await?;
        metrics::counter!("order_transitions_total", "to" => requested.as_str()).increment(1);

        if let Some(direction) = direction
            && let Err(source) = self.reconciler.apply(&required, direction).await
        {
            // The status change is already durable; this is drift, not
            // something to revert.
            metrics::counter!("reconciliation_failures_total").increment(1);
            tracing::error!(
                %order_id,
                status = %requested,
                error = %source,
                "order status committed but stock adjustment failed"
            );
            return Err(LifecycleError::ReconciliationFailed {
                order_id,
                status: requested,
                source: Box::new(source),
            });
        }

        tracing::info!(%order_id, from = %current, to = %requested, "order transitioned");
        Ok(saved)
    }

    /// Replaces a Pending order's line items and total price.
    ///
    /// Re-validates the new aggregated quantities before persisting.
    #[tracing::instrument(skip(self, new_line_items))]
    pub async fn update_line_items(
        &self,
        order_id: OrderId,
        new_line_items: Vec<ProductId>,
        new_total_price: Money,
    ) -> Result<Order> {
        let mut order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(LifecycleError::OrderNotFound(order_id))?;

        order.set_line_items(new_line_items, new_total_price)?;

        let required = required_units(order.line_items());
        self.reconciler.validate(&required).await?;

        let saved = self.store.save(order).await?;
        tracing::info!(%order_id, "order line items updated");
        Ok(saved)
    }

    /// Deletes an order from Pending or Cancelled.
    ///
    /// Never touches stock: a Pending order consumed none, and a
    /// Cancelled order has already restored what it held. Deleting from
    /// Confirmed is rejected — cancel first, so the restoration runs.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> Result<()> {
        let order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(LifecycleError::OrderNotFound(order_id))?;

        if !order.status().can_delete() {
            return Err(LifecycleError::Order(OrderError::ImmutableOrder {
                status: order.status(),
                action: "deleted",
            }));
        }

        self.store.delete_by_id(order_id).await?;
        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(%order_id, "order deleted");
        Ok(())
    }

    /// Loads an order by id. Read-only passthrough to the store.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.store.find_by_id(order_id).await?)
    }

    /// Lists all orders created by the given owner.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Order>> {
        Ok(self.store.find_by_owner(owner_id).await?)
    }
}
