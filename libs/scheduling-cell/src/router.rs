// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::SchedulingState;

pub fn scheduling_routes(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/availability", get(handlers::get_availability))
        .route("/availability/dates", get(handlers::get_available_dates))
        .route("/book", post(handlers::book_appointment))
        .route("/cancel", post(handlers::cancel_appointment))
        .route("/reschedule", post(handlers::reschedule_appointment))
        .route("/appointments/{booking_id}", get(handlers::get_appointment))
        .with_state(state)
}
