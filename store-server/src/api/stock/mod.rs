//! Stock API module

mod handler;

use crate::core::ServerState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/items/{sku}/stock/summary", get(handler::summary))
        .route("/api/items/{sku}/stock/aggregates", get(handler::aggregates))
        .route("/api/items/{sku}/stock/sync", post(handler::sync))
        .route("/api/items/{sku}/stock/distribute", post(handler::distribute))
}
