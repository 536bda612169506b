//! Stock reconciliation against the remote inventory service.

use std::collections::HashMap;
use std::time::Duration;

use domain::ProductId;
use tokio::time::timeout;

use crate::error::{LifecycleError, Result};
use crate::inventory::{InventoryClient, StockLevel};

/// Cross-cutting policy passed to the reconciler at construction.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Upper bound on a single remote inventory call. Exceeding it is
    /// reported as `InventoryUnavailable`.
    pub call_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
        }
    }
}

/// Which way a stock mutation moves the remote quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Deduct required units (order confirmed).
    Reduce,
    /// Add required units back (confirmed order cancelled).
    Restore,
}

impl StockDirection {
    /// Returns the direction name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::Reduce => "reduce",
            StockDirection::Restore => "restore",
        }
    }
}

/// Orchestrates aggregated quantities against the inventory client.
///
/// Owns the only code path allowed to mutate remote stock. Writes to
/// distinct products are independent and not transactional: if one
/// product's write fails, earlier products stay adjusted and no
/// compensating action is attempted here.
pub struct InventoryReconciler<I> {
    client: I,
    config: ReconcilerConfig,
}

impl<I: InventoryClient> InventoryReconciler<I> {
    /// Creates a new reconciler over the given client.
    pub fn new(client: I, config: ReconcilerConfig) -> Self {
        Self { client, config }
    }

    /// Checks that every required quantity is currently available.
    ///
    /// Read-only and safe to call repeatedly. Fails fast with
    /// `ProductNotFound` or `InsufficientStock` on the first offending
    /// product; no mutation happens anywhere before every entry passed.
    #[tracing::instrument(skip(self, required))]
    pub async fn validate(&self, required: &HashMap<ProductId, u32>) -> Result<()> {
        for (product_id, units) in sorted_entries(required) {
            let stock = self.fetch(product_id).await?;
            if stock.quantity < units {
                return Err(LifecycleError::InsufficientStock {
                    product_id: product_id.clone(),
                    required: units,
                    available: stock.quantity,
                });
            }
        }
        Ok(())
    }

    /// Applies the required quantities to remote stock, per product:
    /// fetch the current level, compute the new one, write it back.
    ///
    /// `Reduce` re-checks availability immediately before each write —
    /// the last line of defense against stock changing between
    /// validation and commit. `Restore` only fails if the product
    /// disappeared remotely; adding units back is always safe.
    #[tracing::instrument(skip(self, required))]
    pub async fn apply(
        &self,
        required: &HashMap<ProductId, u32>,
        direction: StockDirection,
    ) -> Result<()> {
        for (product_id, units) in sorted_entries(required) {
            let stock = self.fetch(product_id).await?;

            let new_quantity = match direction {
                StockDirection::Reduce => {
                    if stock.quantity < units {
                        return Err(LifecycleError::InsufficientStock {
                            product_id: product_id.clone(),
                            required: units,
                            available: stock.quantity,
                        });
                    }
                    stock.quantity - units
                }
                StockDirection::Restore => stock.quantity.saturating_add(units),
            };

            self.write(product_id, new_quantity).await?;
            tracing::debug!(
                %product_id,
                units,
                new_quantity,
                direction = direction.as_str(),
                "stock adjusted"
            );
        }
        Ok(())
    }

    async fn fetch(&self, product_id: &ProductId) -> Result<StockLevel> {
        let level = timeout(self.config.call_timeout, self.client.get_stock(product_id))
            .await
            .map_err(|_| {
                LifecycleError::InventoryUnavailable(format!("stock lookup for {product_id} timed out"))
            })??;

        level.ok_or_else(|| LifecycleError::ProductNotFound(product_id.clone()))
    }

    async fn write(&self, product_id: &ProductId, quantity: u32) -> Result<()> {
        timeout(
            self.config.call_timeout,
            self.client.set_stock(product_id, quantity),
        )
        .await
        .map_err(|_| {
            LifecycleError::InventoryUnavailable(format!("stock write for {product_id} timed out"))
        })??;
        Ok(())
    }
}

/// Iterates map entries in product-id order so multi-product failures
/// are deterministic.
fn sorted_entries(required: &HashMap<ProductId, u32>) -> impl Iterator<Item = (&ProductId, u32)> {
    let mut entries: Vec<_> = required.iter().map(|(id, &units)| (id, units)).collect();
    entries.sort_by_key(|(id, _)| *id);
    entries.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InMemoryInventoryClient;

    fn required(entries: &[(&str, u32)]) -> HashMap<ProductId, u32> {
        entries
            .iter()
            .map(|(id, units)| (ProductId::new(*id), *units))
            .collect()
    }

    fn reconciler(client: InMemoryInventoryClient) -> InventoryReconciler<InMemoryInventoryClient> {
        InventoryReconciler::new(client, ReconcilerConfig::default())
    }

    #[tokio::test]
    async fn validate_passes_when_stock_covers_requirements() {
        let client = InMemoryInventoryClient::with_stock([("A", 2), ("B", 1)]);
        let reconciler = reconciler(client);

        reconciler
            .validate(&required(&[("A", 2), ("B", 1)]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn validate_is_read_only() {
        let client = InMemoryInventoryClient::with_stock([("A", 2)]);
        let reconciler = reconciler(client.clone());
        let req = required(&[("A", 2)]);

        for _ in 0..3 {
            reconciler.validate(&req).await.unwrap();
        }
        assert_eq!(client.level_of(&ProductId::new("A")), Some(2));
    }

    #[tokio::test]
    async fn validate_reports_insufficient_stock() {
        let client = InMemoryInventoryClient::with_stock([("A", 1)]);
        let reconciler = reconciler(client.clone());

        let result = reconciler.validate(&required(&[("A", 2)])).await;
        assert!(matches!(
            result,
            Err(LifecycleError::InsufficientStock {
                required: 2,
                available: 1,
                ..
            })
        ));
        assert_eq!(client.level_of(&ProductId::new("A")), Some(1));
    }

    #[tokio::test]
    async fn validate_reports_unknown_product() {
        let client = InMemoryInventoryClient::new();
        let reconciler = reconciler(client);

        let result = reconciler.validate(&required(&[("GHOST", 1)])).await;
        assert!(matches!(result, Err(LifecycleError::ProductNotFound(id)) if id.as_str() == "GHOST"));
    }

    #[tokio::test]
    async fn validate_maps_outage_to_unavailable() {
        let client = InMemoryInventoryClient::with_stock([("A", 2)]);
        client.set_fail_on_get(true);
        let reconciler = reconciler(client);

        let result = reconciler.validate(&required(&[("A", 1)])).await;
        assert!(matches!(
            result,
            Err(LifecycleError::InventoryUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn reduce_writes_back_decremented_levels() {
        let client = InMemoryInventoryClient::with_stock([("A", 2), ("B", 1)]);
        let reconciler = reconciler(client.clone());

        reconciler
            .apply(&required(&[("A", 2), ("B", 1)]), StockDirection::Reduce)
            .await
            .unwrap();

        assert_eq!(client.level_of(&ProductId::new("A")), Some(0));
        assert_eq!(client.level_of(&ProductId::new("B")), Some(0));
    }

    #[tokio::test]
    async fn reduce_rechecks_before_writing() {
        let client = InMemoryInventoryClient::with_stock([("A", 2)]);
        let reconciler = reconciler(client.clone());
        let req = required(&[("A", 2)]);

        reconciler.validate(&req).await.unwrap();

        // Stock shrinks between validate and apply.
        client.set_level("A", 1);

        let result = reconciler.apply(&req, StockDirection::Reduce).await;
        assert!(matches!(
            result,
            Err(LifecycleError::InsufficientStock {
                required: 2,
                available: 1,
                ..
            })
        ));
        assert_eq!(client.level_of(&ProductId::new("A")), Some(1));
    }

    #[tokio::test]
    async fn restore_adds_units_back() {
        let client = InMemoryInventoryClient::with_stock([("A", 0)]);
        let reconciler = reconciler(client.clone());

        reconciler
            .apply(&required(&[("A", 2)]), StockDirection::Restore)
            .await
            .unwrap();

        assert_eq!(client.level_of(&ProductId::new("A")), Some(2));
    }

    #[tokio::test]
    async fn restore_fails_if_product_disappeared() {
        let client = InMemoryInventoryClient::new();
        let reconciler = reconciler(client);

        let result = reconciler
            .apply(&required(&[("GONE", 1)]), StockDirection::Restore)
            .await;
        assert!(matches!(result, Err(LifecycleError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn partial_apply_leaves_earlier_writes_in_place() {
        // C fails after A and B succeeded; no compensation runs.
        let client = InMemoryInventoryClient::with_stock([("A", 5), ("B", 5), ("C", 5)]);
        client.fail_set_for("C");
        let reconciler = reconciler(client.clone());

        let result = reconciler
            .apply(
                &required(&[("A", 1), ("B", 2), ("C", 3)]),
                StockDirection::Reduce,
            )
            .await;

        assert!(matches!(
            result,
            Err(LifecycleError::InventoryUnavailable(_))
        ));
        assert_eq!(client.level_of(&ProductId::new("A")), Some(4));
        assert_eq!(client.level_of(&ProductId::new("B")), Some(3));
        assert_eq!(client.level_of(&ProductId::new("C")), Some(5));
    }
}
