//! Health API module

mod handler;

use crate::core::ServerState;
use axum::{routing::get, Router};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(handler::health))
}
