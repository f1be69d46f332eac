// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::AppError;

use crate::models::{
    AppointmentType, AvailabilityResponse, BookingRequest, CancelRequest, RescheduleRequest,
};
use crate::services::{AvailabilityService, BookingService};
use crate::SchedulingState;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: String,
    pub appointment_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailableDatesParams {
    pub days_ahead: Option<i64>,
    pub appointment_type: Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format. Use YYYY-MM-DD.".to_string()))
}

fn parse_appointment_type(raw: Option<&str>) -> Result<AppointmentType, AppError> {
    let raw = raw.unwrap_or("general-consultation");
    raw.parse().map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid appointment type '{}'. Valid types: {}",
            raw,
            AppointmentType::ALL.map(|t| t.as_str()).join(", ")
        ))
    })
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

pub async fn get_availability(
    State(state): State<Arc<SchedulingState>>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = parse_date(&params.date)?;
    let appointment_type = parse_appointment_type(params.appointment_type.as_deref())?;

    let availability = AvailabilityService::new(Arc::clone(&state.store));
    let slots = availability.slots_for(date, appointment_type).await;

    Ok(Json(AvailabilityResponse {
        date,
        appointment_type,
        duration_minutes: appointment_type.duration_minutes(),
        available_slots: slots,
    }))
}

pub async fn get_available_dates(
    State(state): State<Arc<SchedulingState>>,
    Query(params): Query<AvailableDatesParams>,
) -> Result<Json<Value>, AppError> {
    let appointment_type = parse_appointment_type(params.appointment_type.as_deref())?;
    let days_ahead = params.days_ahead.unwrap_or(14).clamp(1, 90);

    let availability = AvailabilityService::new(Arc::clone(&state.store));
    let dates = availability
        .dates_with_availability(days_ahead, appointment_type)
        .await;

    Ok(Json(json!({ "available_dates": dates })))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

pub async fn book_appointment(
    State(state): State<Arc<SchedulingState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state.config, Arc::clone(&state.store));
    let confirmation = booking.book(request).await?;

    Ok(Json(json!(confirmation)))
}

pub async fn cancel_appointment(
    State(state): State<Arc<SchedulingState>>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state.config, Arc::clone(&state.store));
    let response = booking.cancel(request).await?;

    Ok(Json(json!(response)))
}

pub async fn reschedule_appointment(
    State(state): State<Arc<SchedulingState>>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state.config, Arc::clone(&state.store));
    let response = booking.reschedule(request).await?;

    Ok(Json(json!(response)))
}

pub async fn get_appointment(
    State(state): State<Arc<SchedulingState>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state.config, Arc::clone(&state.store));
    let record = booking.get_booking(&booking_id).await?;

    Ok(Json(json!(record)))
}
