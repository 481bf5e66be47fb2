use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use shared_models::{Appointment, ProviderSchedule, SlotTime, UserRecord};

use crate::store::{BookingScope, BookingStore, StoreError};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    users: HashMap<String, UserRecord>,
    schedules: HashMap<String, ProviderSchedule>,
}

/// In-memory store used by tests and by unconfigured development runs.
///
/// An open scope owns the state lock for its whole read-check-write
/// sequence, so scopes serialize; writes land in a working copy that
/// replaces the shared state on commit and is discarded on abort. That gives
/// the same observable guarantees as the gateway's snapshot-isolated
/// transactions.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user document (test/dev provisioning, not part of the booking
    /// surface).
    pub async fn seed_user(&self, user: UserRecord) {
        self.state.lock().await.users.insert(user.id.clone(), user);
    }

    /// Seed a provider schedule. Duplicate `start_datetime` entries are
    /// rejected to uphold the one-slot-per-time invariant.
    pub async fn seed_schedule(&self, schedule: ProviderSchedule) -> Result<(), StoreError> {
        let mut seen = std::collections::HashSet::new();
        for slot in &schedule.availability {
            if !seen.insert(slot.start_datetime) {
                return Err(StoreError::Serialization(format!(
                    "duplicate slot {} in schedule for provider {}",
                    slot.start_datetime, schedule.provider_id
                )));
            }
        }
        self.state
            .lock()
            .await
            .schedules
            .insert(schedule.provider_id.clone(), schedule);
        Ok(())
    }
}

#[async_trait]
impl BookingStore for MemoryDocumentStore {
    async fn begin(&self) -> Result<Box<dyn BookingScope>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryScope { guard, working }))
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.state.lock().await.users.get(user_id).cloned())
    }

    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn fetch_schedule(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderSchedule>, StoreError> {
        Ok(self.state.lock().await.schedules.get(provider_id).cloned())
    }
}

struct MemoryScope {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl BookingScope for MemoryScope {
    async fn find_user(&mut self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.working.users.get(user_id).cloned())
    }

    async fn find_schedule(
        &mut self,
        provider_id: &str,
    ) -> Result<Option<ProviderSchedule>, StoreError> {
        Ok(self.working.schedules.get(provider_id).cloned())
    }

    async fn mark_slot(
        &mut self,
        provider_id: &str,
        start: &SlotTime,
        booked: bool,
    ) -> Result<u64, StoreError> {
        let Some(schedule) = self.working.schedules.get_mut(provider_id) else {
            return Ok(0);
        };
        let Some(slot) = schedule
            .availability
            .iter_mut()
            .find(|slot| slot.start_datetime == *start)
        else {
            return Ok(0);
        };
        if slot.is_booked == booked {
            // Already in the requested state: nothing modified, which is the
            // lost-race signal the coordinator checks for.
            return Ok(0);
        }
        slot.is_booked = booked;
        Ok(1)
    }

    async fn push_appointment(
        &mut self,
        user_id: &str,
        appointment: &Appointment,
    ) -> Result<u64, StoreError> {
        match self.working.users.get_mut(user_id) {
            Some(user) => {
                user.appointments.push(appointment.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn pull_appointment(
        &mut self,
        user_id: &str,
        appointment_id: Uuid,
    ) -> Result<u64, StoreError> {
        match self.working.users.get_mut(user_id) {
            Some(user) => {
                let before = user.appointments.len();
                user.appointments.retain(|apt| apt.id != appointment_id);
                Ok((before - user.appointments.len()) as u64)
            }
            None => Ok(0),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        *self.guard = self.working;
        Ok(())
    }

    async fn abort(self: Box<Self>) -> Result<(), StoreError> {
        // Dropping the working copy (and the lock with it) discards every
        // buffered write.
        Ok(())
    }
}
