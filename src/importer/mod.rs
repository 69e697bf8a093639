// ==========================================
// Rental Ledger - Import Pipeline
// ==========================================
// File-to-ledger pipeline: tokenizer -> platform detector ->
// column resolver -> row normalizer -> identity/dedup -> billing
// split -> reporter, orchestrated by the importer implementation.
// ==========================================

pub mod billing;
pub mod columns;
pub mod error;
pub mod identity;
pub mod normalizer;
pub mod platform;
pub mod reporter;
pub mod reservation_importer_impl;
pub mod reservation_importer_trait;
pub mod tokenizer;

pub use error::{ImportError, ImportResult};
pub use reservation_importer_impl::ReservationImporterImpl;
pub use reservation_importer_trait::{ImportRequest, PlatformAdapter, ReservationImporter};
