//! Stockwatch API Library
//!
//! Multi-tenant inventory core: transactional product-with-stock creation and
//! low-stock alert derivation over audit history.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod money;
pub mod services;
pub mod sku;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

/// Upper bound on request handling, covering the store calls underneath
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Assembles the full application router
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/products", handlers::products::router())
        .nest("/api/companies", handlers::alerts::router())
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
