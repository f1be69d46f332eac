pub mod error;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod router;
pub mod services;

use std::sync::Arc;

use scheduling_cell::ScheduleStore;
use shared_config::AppConfig;

pub use error::DialogueError;
pub use services::DialogueOrchestrator;

/// Shared state for the chat HTTP surface.
pub struct DialogueState {
    pub orchestrator: DialogueOrchestrator,
}

impl DialogueState {
    pub fn new(config: &AppConfig, store: Arc<ScheduleStore>) -> Self {
        Self {
            orchestrator: DialogueOrchestrator::new(config, store),
        }
    }
}
