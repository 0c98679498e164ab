//! NIDS Dashboard Server
//!
//! Serves the live-traffic dashboard and its polling API on top of
//! `nids-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      NIDS DASHBOARD                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐ │
//! │  │  Static   │  │  Polling API │  │  Run Control         │ │
//! │  │  Page     │  │  (Axum)      │  │  start / stop        │ │
//! │  └───────────┘  └──────┬───────┘  └──────────┬───────────┘ │
//! │                        └──────────┬──────────┘             │
//! │                                   ▼                        │
//! │                      ┌────────────────────────┐            │
//! │                      │  TrafficSimulator      │            │
//! │                      │  (pool + forest model) │            │
//! │                      └────────────────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use nids_core::{ForestModel, TrafficSimulator};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<TrafficSimulator>,
    pub model: Arc<ForestModel>,
}

impl AppState {
    pub fn new(simulator: Arc<TrafficSimulator>, model: Arc<ForestModel>) -> Self {
        Self { simulator, model }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/health", get(handlers::health::check));

    let api_routes = Router::new()
        .route("/api/stats", get(handlers::stats::get_stats))
        .route("/api/alerts", get(handlers::alerts::list))
        .route("/api/control/start", post(handlers::control::start))
        .route("/api/control/stop", post(handlers::control::stop))
        .route("/api/model", get(handlers::model::info));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
