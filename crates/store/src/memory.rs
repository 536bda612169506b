use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, OwnerId};
use domain::Order;
use tokio::sync::RwLock;

use crate::{OrderStore, Result};

/// In-memory order store for tests and local runs.
///
/// Provides the same interface and id-assignment behavior as the
/// PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all stored orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn save(&self, order: Order) -> Result<Order> {
        let id = match order.id() {
            Some(id) => id,
            None => OrderId::new(),
        };
        let order = order.with_id(id);

        let mut orders = self.orders.write().await;
        orders.insert(id, order.clone());
        Ok(order)
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<bool> {
        let mut orders = self.orders.write().await;
        Ok(orders.remove(&id).is_some())
    }

    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| o.owner_id() == owner_id)
            .cloned()
            .collect();
        matching.sort_by_key(|o| o.created_date());
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, ProductId};

    fn new_order(owner_id: OwnerId) -> Order {
        Order::new(
            owner_id,
            vec![ProductId::new("SKU-001")],
            Money::from_cents(1000),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_assigns_id_on_first_save() {
        let store = InMemoryOrderStore::new();
        let order = new_order(OwnerId::new());
        assert!(order.id().is_none());

        let saved = store.save(order).await.unwrap();
        assert!(saved.id().is_some());
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn save_preserves_existing_id() {
        let store = InMemoryOrderStore::new();
        let saved = store.save(new_order(OwnerId::new())).await.unwrap();
        let id = saved.id().unwrap();

        let resaved = store.save(saved).await.unwrap();
        assert_eq!(resaved.id(), Some(id));
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn find_by_id_roundtrip() {
        let store = InMemoryOrderStore::new();
        let saved = store.save(new_order(OwnerId::new())).await.unwrap();
        let id = saved.id().unwrap();

        let found = store.find_by_id(id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id(), Some(id));

        let missing = store.find_by_id(OrderId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_by_id_reports_whether_removed() {
        let store = InMemoryOrderStore::new();
        let saved = store.save(new_order(OwnerId::new())).await.unwrap();
        let id = saved.id().unwrap();

        assert!(store.delete_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn find_by_owner_filters_and_sorts() {
        let store = InMemoryOrderStore::new();
        let owner = OwnerId::new();
        let other = OwnerId::new();

        let first = store.save(new_order(owner)).await.unwrap();
        let second = store.save(new_order(owner)).await.unwrap();
        store.save(new_order(other)).await.unwrap();

        let mine = store.find_by_owner(owner).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.owner_id() == owner));
        assert_eq!(mine[0].id(), first.id());
        assert_eq!(mine[1].id(), second.id());
    }
}
