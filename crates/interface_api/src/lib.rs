//! HTTP API Layer
//!
//! This crate exposes the debtor report over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: debtor report, cache administration, health checks
//! - **Middleware**: request logging
//! - **DTOs**: response bodies
//! - **Error Handling**: consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(service, vec![billing_store, cache_store]);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_reporting::DebtorReportService;

use crate::handlers::{debtors, health};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Debtor report service
    pub service: DebtorReportService,
    /// Backing stores checked by the readiness endpoint
    pub dependencies: Vec<Arc<dyn HealthCheckable>>,
}

impl AppState {
    /// Creates application state
    pub fn new(service: DebtorReportService, dependencies: Vec<Arc<dyn HealthCheckable>>) -> Self {
        Self { service, dependencies }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let debtor_routes = Router::new()
        .route("/", get(debtors::get_debtors))
        .route("/cache", delete(debtors::clear_cache));

    let api_routes = Router::new()
        .nest("/debtors", debtor_routes)
        .layer(axum_middleware::from_fn(request_log_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
