// ==========================================
// Rental Ledger - Domain Layer
// ==========================================
// Entities and closed types; no I/O, no business orchestration.
// ==========================================

pub mod property;
pub mod reservation;
pub mod types;

pub use property::{BillingConfiguration, Guest, Property};
pub use reservation::{
    CanonicalReservation, ImportBatch, ImportOutcome, ImportResults, ImportRowError, ImportSummary,
};
pub use types::{Platform, RowErrorCategory, RowOutcome};
