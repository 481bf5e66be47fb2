pub mod booking;
pub mod error;

pub use booking::{Appointment, ProviderSchedule, Slot, SlotTime, SlotTimeError, UserRecord};
pub use error::AppError;
