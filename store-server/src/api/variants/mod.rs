//! Variant API module

mod handler;

use crate::core::ServerState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/items/{sku}/variants", get(handler::list_grouped).post(handler::save_row))
        .route("/api/items/{sku}/variants/ensure", post(handler::ensure_matrix))
        .route("/api/items/{sku}/colors", get(handler::list_colors))
        .route("/api/items/{sku}/genders", get(handler::list_genders))
        .route("/api/variants/{id}", put(handler::update_row))
        .route("/api/selection", post(handler::resolve_selection))
}
