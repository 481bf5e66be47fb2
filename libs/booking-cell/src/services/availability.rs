// libs/booking-cell/src/services/availability.rs
use shared_models::{ProviderSchedule, SlotTime};

/// Outcome of checking a requested start time against a schedule snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCheck {
    Available,
    AlreadyBooked,
    SlotNotFound,
}

/// Decide whether the slot keyed by `start` is currently bookable.
///
/// Pure decision on the given snapshot: exact match on the canonical slot
/// time, no tolerance window, no side effects. Safe to call speculatively
/// outside an atomic scope; the coordinator re-runs it on the in-scope
/// snapshot before writing.
pub fn check_slot(schedule: &ProviderSchedule, start: &SlotTime) -> SlotCheck {
    match schedule.slot_at(start) {
        None => SlotCheck::SlotNotFound,
        Some(slot) if slot.is_booked => SlotCheck::AlreadyBooked,
        Some(_) => SlotCheck::Available,
    }
}
