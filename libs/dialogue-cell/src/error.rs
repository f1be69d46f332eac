use scheduling_cell::SchedulingError;
use shared_models::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogueError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("Turn processing error: {0}")]
    Internal(String),
}

impl From<DialogueError> for AppError {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::SessionNotFound(id) => {
                AppError::NotFound(format!("Session not found: {}", id))
            }
            DialogueError::Scheduling(e) => e.into(),
            DialogueError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
