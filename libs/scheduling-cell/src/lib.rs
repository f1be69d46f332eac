pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use shared_config::AppConfig;

pub use error::SchedulingError;
pub use models::ClinicSchedule;

/// The clinic schedule document behind the single persistence boundary.
pub type ScheduleStore = shared_store::JsonStore<ClinicSchedule>;

/// Shared state for the scheduling HTTP surface.
pub struct SchedulingState {
    pub config: AppConfig,
    pub store: Arc<ScheduleStore>,
}
