//! Color template API module

mod handler;

use crate::core::ServerState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/color-templates", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/duplicate", post(handler::duplicate))
}
