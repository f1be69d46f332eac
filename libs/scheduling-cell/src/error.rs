use shared_models::AppError;
use shared_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate,

    #[error("Invalid appointment type: {0}")]
    InvalidAppointmentType(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("The selected time slot is no longer available. Please choose another slot.")]
    SlotUnavailable,

    #[error("Appointment not found: {0}")]
    BookingNotFound(String),

    #[error("Invalid confirmation code.")]
    ConfirmationCodeMismatch,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::InvalidDate | SchedulingError::InvalidAppointmentType(_) => {
                AppError::BadRequest(err.to_string())
            }
            SchedulingError::Validation(msg) => AppError::ValidationError(msg),
            SchedulingError::SlotUnavailable => AppError::Conflict(err.to_string()),
            SchedulingError::BookingNotFound(_) => AppError::NotFound(err.to_string()),
            SchedulingError::ConfirmationCodeMismatch => AppError::Auth(err.to_string()),
            SchedulingError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}
