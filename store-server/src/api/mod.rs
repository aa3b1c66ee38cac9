//! API route modules
//!
//! - [`health`] - liveness probe
//! - [`size_templates`] - size template CRUD, duplicate, apply
//! - [`color_templates`] - color template CRUD, duplicate
//! - [`option_links`] - assignment ledger
//! - [`cascade`] - resolved options and cascade settings
//! - [`variants`] - variant matrix, grouped views, selection lookup
//! - [`stock`] - aggregate sync and even redistribution

pub mod cascade;
pub mod color_templates;
pub mod health;
pub mod option_links;
pub mod size_templates;
pub mod stock;
pub mod variants;

use crate::core::ServerState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
pub fn app_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(size_templates::router())
        .merge(color_templates::router())
        .merge(option_links::router())
        .merge(cascade::router())
        .merge(variants::router())
        .merge(stock::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
