//! Option link (assignment ledger) API module

mod handler;

use crate::core::ServerState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/option-links", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_for_target).post(handler::assign))
        .route("/{id}", delete(handler::unassign))
        .route("/clear", post(handler::clear))
        .route("/items/{sku}", get(handler::list_for_item))
}
