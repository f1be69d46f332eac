use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use dialogue_cell::router::chat_routes;
use dialogue_cell::DialogueState;
use scheduling_cell::router::scheduling_routes;
use scheduling_cell::SchedulingState;

pub fn create_router(
    scheduling_state: Arc<SchedulingState>,
    dialogue_state: Arc<DialogueState>,
) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling assistant API is running!" }))
        .nest("/chat", chat_routes(dialogue_state))
        .nest("/scheduling", scheduling_routes(scheduling_state))
}
