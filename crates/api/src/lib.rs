//! HTTP API server for the warehouse parts inventory.
//!
//! Exposes the part service over REST under `/api/v1/parts`, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch};
use domain::PartService;
use metrics_exporter_prometheus::PrometheusHandle;
use part_store::PartStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::parts::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: PartStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/v1/parts",
            get(routes::parts::list::<S>).post(routes::parts::add::<S>),
        )
        .route(
            "/api/v1/parts/{material_number}/{serial_number}/{supplier_number}",
            get(routes::parts::get::<S>).delete(routes::parts::delete::<S>),
        )
        .route(
            "/api/v1/parts/{material_number}/{serial_number}/{supplier_number}/add",
            patch(routes::parts::increase::<S>),
        )
        .route(
            "/api/v1/parts/{material_number}/{serial_number}/{supplier_number}/subtract",
            patch(routes::parts::decrease::<S>),
        )
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

/// Creates the application state around the given part store.
pub fn create_default_state<S: PartStore + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        part_service: PartService::new(store),
    })
}
