// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::UserRecord;

use crate::models::{BookAppointmentRequest, BookingError, CreateUserRequest};
use crate::router::BookingState;

fn to_app_error(e: BookingError) -> AppError {
    match e {
        BookingError::Validation(msg) => AppError::BadRequest(msg),
        BookingError::UserNotFound => AppError::NotFound("User not found".to_string()),
        BookingError::ScheduleNotFound => {
            AppError::NotFound("Provider schedule not found".to_string())
        }
        BookingError::SlotNotFound => {
            AppError::NotFound("No slot at the requested time".to_string())
        }
        BookingError::AppointmentNotFound => {
            AppError::NotFound("Appointment not found".to_string())
        }
        BookingError::SlotUnavailable => AppError::Conflict("Slot is not available".to_string()),
        BookingError::ScheduleUpdateFailed | BookingError::UserUpdateFailed => AppError::Conflict(
            "Booking lost a race with a concurrent update, please retry".to_string(),
        ),
        BookingError::Store(err) => match err {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other.to_string()),
        },
    }
}

// ==============================================================================
// USER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<BookingState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let user = UserRecord {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        appointments: Vec::new(),
    };

    state
        .store
        .insert_user(&user)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User successfully created.",
            "id": user.id
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<BookingState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .store
        .fetch_user(&user_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!(user)))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<BookingState>>,
    Path(user_id): Path<String>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .coordinator
        .book(&user_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment successfully booked"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<BookingState>>,
    Path((user_id, appointment_id)): Path<(String, Uuid)>,
) -> Result<Json<Value>, AppError> {
    state
        .coordinator
        .cancel(&user_id, appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment successfully canceled"
    })))
}

// ==============================================================================
// SCHEDULE HANDLERS
// ==============================================================================

/// Read-only schedule view. Slot provisioning itself happens upstream and is
/// not part of this service.
#[axum::debug_handler]
pub async fn get_provider_schedule(
    State(state): State<Arc<BookingState>>,
    Path(provider_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let schedule = state
        .store
        .fetch_schedule(&provider_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Provider schedule not found".to_string()))?;

    Ok(Json(json!(schedule)))
}
