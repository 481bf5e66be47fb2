use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared_models::{Appointment, ProviderSchedule, SlotTime, UserRecord};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("transaction conflict: {0}")]
    Conflict(String),

    #[error("malformed store payload: {0}")]
    Serialization(String),

    #[error("store gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },
}

/// Access to the user and schedule stores. Constructed once at startup and
/// injected into whatever needs it; there is no process-global client.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Open an atomic scope spanning both stores. Everything performed
    /// through the returned scope commits or aborts as a whole.
    async fn begin(&self) -> Result<Box<dyn BookingScope>, StoreError>;

    // Plain reads and creates outside any transaction, for the non-booking
    // endpoints.
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError>;
    async fn fetch_schedule(&self, provider_id: &str)
        -> Result<Option<ProviderSchedule>, StoreError>;
}

/// One open atomic scope. Reads observe a snapshot consistent with the
/// scope's writes; nothing is visible outside until `commit`.
///
/// The write operations return the number of documents actually modified.
/// A zero count on a write the caller expected to land is the race-detection
/// signal: some other transaction changed the target first.
#[async_trait]
pub trait BookingScope: Send {
    async fn find_user(&mut self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_schedule(&mut self, provider_id: &str)
        -> Result<Option<ProviderSchedule>, StoreError>;

    /// Flip the `is_booked` flag of the slot keyed by `start` on the given
    /// provider's schedule. Targeted update: only the matching slot is
    /// touched, and the slot counts as modified only when its flag actually
    /// changed state.
    async fn mark_slot(
        &mut self,
        provider_id: &str,
        start: &SlotTime,
        booked: bool,
    ) -> Result<u64, StoreError>;

    /// Append an appointment to the user's embedded list.
    async fn push_appointment(
        &mut self,
        user_id: &str,
        appointment: &Appointment,
    ) -> Result<u64, StoreError>;

    /// Remove the appointment with the given id from the user's list.
    async fn pull_appointment(
        &mut self,
        user_id: &str,
        appointment_id: Uuid,
    ) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn abort(self: Box<Self>) -> Result<(), StoreError>;
}
