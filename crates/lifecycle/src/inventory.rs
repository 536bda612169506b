//! Inventory client boundary and in-memory implementation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point-in-time view of remote stock for one product.
///
/// Externally owned; never cached across calls because it may change
/// between reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The remote inventory call itself failed (network, timeout).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InventoryUnavailable(pub String);

/// Request/response wrapper around the remote stock endpoints.
///
/// No business logic and no internal retries. Mutating calls must never
/// be blindly retried by a generic retry layer: a retry after a
/// successful-but-unacknowledged write would double-apply the delta.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Fetches current stock for a product. `None` means the product is
    /// unknown to the inventory service.
    async fn get_stock(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<StockLevel>, InventoryUnavailable>;

    /// Overwrites the stock quantity for a product.
    async fn set_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), InventoryUnavailable>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    stock: HashMap<ProductId, u32>,
    fail_on_get: bool,
    fail_set_for: HashSet<ProductId>,
}

/// In-memory inventory client for tests and local runs.
///
/// Failure toggles simulate an unreachable remote: `set_fail_on_get`
/// fails every lookup, `fail_set_for` fails writes for specific
/// products (to exercise partial-apply scenarios).
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryClient {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryClient {
    /// Creates a new client with no stock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client preloaded with the given stock levels.
    pub fn with_stock<P: Into<ProductId>>(levels: impl IntoIterator<Item = (P, u32)>) -> Self {
        let client = Self::new();
        for (product_id, quantity) in levels {
            client.set_level(product_id, quantity);
        }
        client
    }

    /// Sets the stock level for a product directly.
    pub fn set_level(&self, product_id: impl Into<ProductId>, quantity: u32) {
        self.state
            .write()
            .unwrap()
            .stock
            .insert(product_id.into(), quantity);
    }

    /// Returns the current stock level for a product, if known.
    pub fn level_of(&self, product_id: &ProductId) -> Option<u32> {
        self.state.read().unwrap().stock.get(product_id).copied()
    }

    /// Makes every `get_stock` call fail.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.state.write().unwrap().fail_on_get = fail;
    }

    /// Makes `set_stock` fail for the given product.
    pub fn fail_set_for(&self, product_id: impl Into<ProductId>) {
        self.state
            .write()
            .unwrap()
            .fail_set_for
            .insert(product_id.into());
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventoryClient {
    async fn get_stock(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<StockLevel>, InventoryUnavailable> {
        let state = self.state.read().unwrap();

        if state.fail_on_get {
            return Err(InventoryUnavailable("connection refused".to_string()));
        }

        Ok(state.stock.get(product_id).map(|&quantity| StockLevel {
            product_id: product_id.clone(),
            quantity,
        }))
    }

    async fn set_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), InventoryUnavailable> {
        let mut state = self.state.write().unwrap();

        if state.fail_set_for.contains(product_id) {
            return Err(InventoryUnavailable(format!(
                "write to {product_id} failed"
            )));
        }

        state.stock.insert(product_id.clone(), quantity);
        Ok(())
    }
}
