// ==========================================
// Rental Ledger - Core Library
// ==========================================
// Reservation import pipeline for multi-platform rental
// bookkeeping: platform exports in, canonical billable
// reservations and immutable audit batches out.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Storage layer - data access
pub mod repository;

// Import layer - external data
pub mod importer;

// Configuration layer
pub mod config;

// Database infrastructure (connection init / unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// API layer - outer surface
pub mod api;

// ==========================================
// Core type re-exports
// ==========================================

// Domain types
pub use domain::types::{Platform, RowErrorCategory, RowOutcome};

// Domain entities
pub use domain::{
    BillingConfiguration, CanonicalReservation, Guest, ImportBatch, ImportOutcome, ImportResults,
    ImportRowError, ImportSummary, Property,
};

// Import pipeline
pub use importer::{ImportError, ImportRequest, ReservationImporter, ReservationImporterImpl};

// Storage
pub use repository::{ReservationStore, ReservationStoreImpl};

// API
pub use api::{ApiError, FixedWindowRateLimiter, ImportApi, ImportResponse};

// Configuration
pub use config::ImportLimits;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "rental-ledger";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
