//! Router assembly.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::SharedState;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/auth", get(handler::begin_auth))
        .route("/oauth2callback", get(handler::oauth_callback))
        .route("/create-event", post(handler::create_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
