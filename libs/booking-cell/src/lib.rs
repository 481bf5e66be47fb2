pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::availability::{check_slot, SlotCheck};
pub use services::coordinator::BookingCoordinator;
