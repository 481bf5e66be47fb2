pub mod memory;
pub mod rest;
pub mod store;

pub use memory::MemoryDocumentStore;
pub use rest::RestDocumentStore;
pub use store::{BookingScope, BookingStore, StoreError};
