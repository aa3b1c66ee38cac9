//! Cascade API module: resolved options and settings

mod handler;

use crate::core::ServerState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/items/{sku}/options", get(handler::resolve))
        .route("/api/items/{sku}/cascade-settings", get(handler::get_settings))
        .route(
            "/api/cascade-settings",
            put(handler::save_settings).delete(handler::delete_settings),
        )
}
