//! HTTP API server for the order lifecycle service.
//!
//! Provides REST endpoints for order management and status transitions,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use lifecycle::{InMemoryInventoryClient, OrderLifecycleService, ReconcilerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}", put(routes::orders::update::<S>))
        .route("/orders/{id}", delete(routes::orders::remove::<S>))
        .route("/orders/{id}/status", put(routes::orders::set_status::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over the given store, with an
/// in-memory inventory client.
///
/// The inventory client is also returned so callers (tests, local runs)
/// can seed stock levels. It starts empty, so every create is rejected
/// with a product-not-found error until stock is seeded; a real
/// deployment builds its `AppState` with a remote-backed
/// `InventoryClient` instead of using this constructor.
pub fn create_default_state<S: OrderStore + 'static>(
    store: S,
) -> (Arc<AppState<S>>, InMemoryInventoryClient) {
    let inventory = InMemoryInventoryClient::new();
    let lifecycle = OrderLifecycleService::new(store, inventory.clone(), ReconcilerConfig::default());

    let state = Arc::new(AppState { lifecycle });
    (state, inventory)
}
