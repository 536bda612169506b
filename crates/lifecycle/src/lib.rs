//! Order lifecycle orchestration.
//!
//! This crate coordinates two independently-owned resources — the order
//! record and the remote product stock — without a shared transaction:
//!
//! 1. Validate availability (read-only) against the inventory service
//! 2. Commit the order's own status change to the store
//! 3. Reduce or restore stock as a follow-up step
//!
//! A failure after step 2 is surfaced as `ReconciliationFailed` rather
//! than rolled back: the committed status is the source of truth for
//! what should have happened, and the resulting drift is left to an
//! operator or a separate sweep to correct.

pub mod error;
pub mod inventory;
pub mod reconciler;
pub mod service;

pub use error::{LifecycleError, Result};
pub use inventory::{InMemoryInventoryClient, InventoryClient, InventoryUnavailable, StockLevel};
pub use reconciler::{InventoryReconciler, ReconcilerConfig, StockDirection};
pub use service::OrderLifecycleService;
