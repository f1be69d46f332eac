// libs/dialogue-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::AppError;

use crate::models::{MessageRequest, MessageResponse, SessionHistoryResponse};
use crate::DialogueState;

pub async fn send_message(
    State(state): State<Arc<DialogueState>>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }

    let response = state
        .orchestrator
        .process_message(&request.message, request.session_id)
        .await?;

    Ok(Json(response))
}

pub async fn get_session(
    State(state): State<Arc<DialogueState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionHistoryResponse>, AppError> {
    let history = state.orchestrator.session_history(&session_id).await?;
    Ok(Json(history))
}

pub async fn delete_session(
    State(state): State<Arc<DialogueState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.orchestrator.delete_session(&session_id).await?;
    Ok(Json(json!({ "status": "deleted", "session_id": session_id })))
}
