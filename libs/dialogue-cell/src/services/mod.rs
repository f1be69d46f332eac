pub mod generation;
pub mod intent;
pub mod orchestrator;
pub mod parsers;
pub mod retrieval;
pub mod session;
pub mod state;

pub use orchestrator::DialogueOrchestrator;
pub use session::SessionStore;
pub use state::StateMachine;
