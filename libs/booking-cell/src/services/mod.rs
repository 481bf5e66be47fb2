pub mod availability;
pub mod coordinator;

pub use availability::{check_slot, SlotCheck};
pub use coordinator::BookingCoordinator;
