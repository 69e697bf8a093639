// ==========================================
// Rental Ledger - Storage Layer
// ==========================================

pub mod error;
pub mod reservation_store;
pub mod reservation_store_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use reservation_store::ReservationStore;
pub use reservation_store_impl::ReservationStoreImpl;
