// libs/booking-cell/src/services/coordinator.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{BookingScope, BookingStore};
use shared_models::Appointment;

use crate::models::{BookAppointmentRequest, BookingError};
use crate::services::availability::{check_slot, SlotCheck};

/// Orchestrates the atomic read-check-write sequence across the user and
/// schedule stores for booking and cancellation.
///
/// The coordinator holds no persistent state of its own; it borrows the
/// injected store for the duration of one atomic scope per operation. The
/// scope is opened only after input validation and is explicitly committed
/// or aborted on every exit path.
pub struct BookingCoordinator {
    store: Arc<dyn BookingStore>,
}

impl BookingCoordinator {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Book the slot at `start_datetime` on the provider's schedule for the
    /// given user. Either the slot flip and the appointment append both
    /// land, or neither does.
    pub async fn book(
        &self,
        user_id: &str,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        // Shape validation happens before any store access; no transaction
        // is opened for malformed input.
        if user_id.trim().is_empty() {
            return Err(BookingError::Validation("user_id is required".to_string()));
        }
        let provider_id = request
            .provider_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| BookingError::Validation("provider_id is required".to_string()))?;
        let start_datetime = request
            .start_datetime
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| BookingError::Validation("start_datetime is required".to_string()))?;
        let start = start_datetime
            .parse()
            .map_err(|e: shared_models::SlotTimeError| BookingError::Validation(e.to_string()))?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            provider_id,
            start_datetime: start,
            reason: request.reason,
            notes: request.notes,
        };

        debug!(
            "Booking slot {} with provider {} for user {}",
            appointment.start_datetime, appointment.provider_id, user_id
        );

        let mut scope = self.store.begin().await?;
        let outcome = Self::book_in_scope(scope.as_mut(), &appointment).await;
        let appointment = Self::finish(scope, outcome.map(|()| appointment)).await?;

        info!(
            "Appointment {} booked for user {} with provider {}",
            appointment.id, appointment.user_id, appointment.provider_id
        );
        Ok(appointment)
    }

    /// Cancel the user's appointment and free the slot it occupied. Not
    /// idempotent by design: a repeated cancel finds no appointment and
    /// never releases a slot a later booking may have re-occupied.
    pub async fn cancel(&self, user_id: &str, appointment_id: Uuid) -> Result<(), BookingError> {
        if user_id.trim().is_empty() {
            return Err(BookingError::Validation("user_id is required".to_string()));
        }

        debug!("Cancelling appointment {} for user {}", appointment_id, user_id);

        let mut scope = self.store.begin().await?;
        let outcome = Self::cancel_in_scope(scope.as_mut(), user_id, appointment_id).await;
        Self::finish(scope, outcome).await?;

        info!("Appointment {} cancelled for user {}", appointment_id, user_id);
        Ok(())
    }

    /// Single exit point for the atomic scope: commit on success, abort on
    /// any failure before the error propagates. Partial writes are never
    /// visible outside a committed scope.
    async fn finish<T>(
        scope: Box<dyn BookingScope>,
        outcome: Result<T, BookingError>,
    ) -> Result<T, BookingError> {
        match outcome {
            Ok(value) => {
                scope.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = scope.abort().await {
                    warn!("Failed to abort scope after {}: {}", err, abort_err);
                }
                Err(err)
            }
        }
    }

    async fn book_in_scope(
        scope: &mut dyn BookingScope,
        appointment: &Appointment,
    ) -> Result<(), BookingError> {
        if scope.find_user(&appointment.user_id).await?.is_none() {
            return Err(BookingError::UserNotFound);
        }

        let schedule = scope
            .find_schedule(&appointment.provider_id)
            .await?
            .ok_or(BookingError::ScheduleNotFound)?;

        match check_slot(&schedule, &appointment.start_datetime) {
            SlotCheck::SlotNotFound => return Err(BookingError::SlotNotFound),
            SlotCheck::AlreadyBooked => return Err(BookingError::SlotUnavailable),
            SlotCheck::Available => {}
        }

        // Targeted update of the one matching slot. Zero modified means a
        // concurrent booking committed between our read and this write.
        let modified = scope
            .mark_slot(&appointment.provider_id, &appointment.start_datetime, true)
            .await?;
        if modified == 0 {
            warn!(
                "Slot {} on provider {} was taken concurrently",
                appointment.start_datetime, appointment.provider_id
            );
            return Err(BookingError::ScheduleUpdateFailed);
        }

        let modified = scope
            .push_appointment(&appointment.user_id, appointment)
            .await?;
        if modified == 0 {
            return Err(BookingError::UserUpdateFailed);
        }

        Ok(())
    }

    async fn cancel_in_scope(
        scope: &mut dyn BookingScope,
        user_id: &str,
        appointment_id: Uuid,
    ) -> Result<(), BookingError> {
        let user = scope
            .find_user(user_id)
            .await?
            .ok_or(BookingError::UserNotFound)?;

        let appointment = user
            .find_appointment(appointment_id)
            .cloned()
            .ok_or(BookingError::AppointmentNotFound)?;

        if scope.pull_appointment(user_id, appointment_id).await? == 0 {
            return Err(BookingError::UserUpdateFailed);
        }

        // The removed appointment's canonical start time is the join key
        // that frees the slot it occupied.
        let modified = scope
            .mark_slot(&appointment.provider_id, &appointment.start_datetime, false)
            .await?;
        if modified == 0 {
            return Err(BookingError::ScheduleUpdateFailed);
        }

        Ok(())
    }
}
