// libs/booking-cell/src/models.rs
use serde::Deserialize;

use shared_database::StoreError;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Body of `POST /users/{user_id}/appointment`. The required fields are
/// optional at the deserialization layer so their absence surfaces as a
/// validation error, not a body rejection; `start_datetime` arrives as text
/// and is parsed into the canonical slot time before any store access.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookAppointmentRequest {
    pub provider_id: Option<String>,
    pub start_datetime: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

/// Every abort path of the booking coordinator carries one of these, so
/// callers can tell a permanent miss (not found) from a retryable conflict.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("user not found")]
    UserNotFound,

    #[error("provider schedule not found")]
    ScheduleNotFound,

    #[error("no slot at the requested time")]
    SlotNotFound,

    #[error("slot is not available")]
    SlotUnavailable,

    #[error("appointment not found")]
    AppointmentNotFound,

    #[error("failed to update provider's schedule")]
    ScheduleUpdateFailed,

    #[error("failed to update user's account")]
    UserUpdateFailed,

    #[error(transparent)]
    Store(#[from] StoreError),
}
