// ==========================================
// Rental Ledger - Reservation Domain Model
// ==========================================
// Canonical billable reservation records plus the audit types
// produced by one import run. Reservations are created once by
// the importer and never mutated by it afterwards; ImportBatch
// is immutable audit history.
// ==========================================

use crate::domain::types::{Platform, RowErrorCategory};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// CanonicalReservation - billable reservation record
// ==========================================
// Invariants:
// - check_in < check_out, nights >= 1
// - owner_amount + manager_amount == host_earnings (within cents)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalReservation {
    // ===== Identity =====
    /// Platform-issued or synthesized identity key, unique per user scope.
    pub confirmation_code: String,
    pub platform: Platform,
    pub user_id: String,

    // ===== Guest =====
    pub guest_name: String,
    pub guest_email: Option<String>,
    /// Resolved guest entity, when one could be matched or created.
    pub guest_id: Option<String>,

    // ===== Stay =====
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,

    // ===== Financials =====
    pub gross_amount: f64,
    pub host_earnings: f64,
    /// Always sourced from the property billing configuration, never the file.
    pub cleaning_fee: f64,
    /// Commission retained by the marketplace itself.
    pub platform_service_fee: f64,
    pub owner_amount: f64,
    pub manager_amount: f64,

    // ===== Association =====
    pub property_id: String,
    pub billing_config_id: String,
    /// Listing name as written in the export, kept for traceability.
    pub source_listing_name: Option<String>,

    // ===== Audit =====
    pub import_batch_id: String,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// ImportRowError - one errored row in a batch
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowError {
    /// 1-based file row number (header is row 1).
    pub row_number: usize,
    pub category: RowErrorCategory,
    /// Human-readable reason, e.g. the unresolved listing text.
    pub reason: String,
    /// Snapshot of the offending raw values.
    pub raw_data: serde_json::Value,
}

// ==========================================
// ImportBatch - one upload's audit record
// ==========================================
// Persisted once per upload regardless of row-level outcomes.
// Supports manual rollback via import_batch_id on reservations;
// there is no automatic rollback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub user_id: String,
    pub file_name: String,
    pub platform: Platform,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub error_count: usize,
    pub errors: Vec<ImportRowError>,
    /// Distinct source listing names seen, for diagnosing mismatches.
    pub listings_found: Vec<String>,
    /// Rows whose day/month order was guessed (both components <= 12).
    pub ambiguous_dates: usize,
    /// Target property forced by the caller, if any.
    pub target_property_id: Option<String>,
    pub imported_at: DateTime<Utc>,
}

// ==========================================
// ImportResults / ImportSummary / ImportOutcome
// ==========================================
// Structured result returned to the caller after one run.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResults {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
    pub import_batch_id: String,
    pub listings_found: Vec<String>,
    pub ambiguous_dates: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub platform: Platform,
    pub results: ImportResults,
    pub summary: ImportSummary,
}
