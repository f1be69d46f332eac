// libs/dialogue-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::DialogueState;

pub fn chat_routes(state: Arc<DialogueState>) -> Router {
    Router::new()
        .route("/message", post(handlers::send_message))
        .route(
            "/session/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .with_state(state)
}
