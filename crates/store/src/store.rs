use async_trait::async_trait;
use common::{OrderId, OwnerId};
use domain::Order;

use crate::Result;

/// Key-value persistence contract for orders.
///
/// The store assigns an `OrderId` on first save; subsequent saves with
/// the same id overwrite the stored record. No cross-record transaction
/// is offered or assumed.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads an order by id, or `None` if absent.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Persists an order, assigning an id if it does not have one yet.
    ///
    /// Returns the stored order, id included.
    async fn save(&self, order: Order) -> Result<Order>;

    /// Deletes an order by id. Returns true if a record was removed.
    async fn delete_by_id(&self, id: OrderId) -> Result<bool>;

    /// Returns all orders created by the given owner.
    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Order>>;
}
