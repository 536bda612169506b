//! Order persistence boundary.
//!
//! The order record is externally owned state: the service treats this
//! store as the source of truth for what an order's status *should* be.
//! Two implementations are provided: an in-memory store for tests and
//! local runs, and a PostgreSQL-backed store.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::OrderStore;
