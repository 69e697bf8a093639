// ==========================================
// Rental Ledger - Import Reporter
// ==========================================
// Stage 6: run accumulator. Collects per-row outcomes during the
// loop and produces both the persisted audit record and the
// structured result returned to the caller. The audit record is
// written even when zero rows import.
// ==========================================

use crate::domain::reservation::{
    ImportBatch, ImportOutcome, ImportResults, ImportRowError, ImportSummary,
};
use crate::domain::types::{Platform, RowErrorCategory};
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

pub struct ImportReporter {
    batch_id: String,
    imported: usize,
    skipped: usize,
    errors: Vec<ImportRowError>,
    // BTreeSet keeps the listing list deduplicated and ordered.
    listings: BTreeSet<String>,
    ambiguous_dates: usize,
}

impl ImportReporter {
    pub fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            imported: 0,
            skipped: 0,
            errors: Vec::new(),
            listings: BTreeSet::new(),
            ambiguous_dates: 0,
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn record_imported(&mut self) {
        self.imported += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_error(
        &mut self,
        row_number: usize,
        category: RowErrorCategory,
        reason: impl Into<String>,
        raw_data: serde_json::Value,
    ) {
        self.errors.push(ImportRowError {
            row_number,
            category,
            reason: reason.into(),
            raw_data,
        });
    }

    pub fn record_listing(&mut self, listing: &str) {
        let trimmed = listing.trim();
        if !trimmed.is_empty() {
            self.listings.insert(trimmed.to_string());
        }
    }

    pub fn record_ambiguous_date(&mut self) {
        self.ambiguous_dates += 1;
    }

    /// Close the run: audit record plus caller-facing outcome.
    pub fn finish(
        self,
        user_id: &str,
        file_name: &str,
        platform: Platform,
        total_rows: usize,
        target_property_id: Option<&str>,
    ) -> (ImportBatch, ImportOutcome) {
        let listings_found: Vec<String> = self.listings.into_iter().collect();

        let batch = ImportBatch {
            batch_id: self.batch_id.clone(),
            user_id: user_id.to_string(),
            file_name: file_name.to_string(),
            platform,
            total_rows,
            imported: self.imported,
            skipped: self.skipped,
            error_count: self.errors.len(),
            errors: self.errors.clone(),
            listings_found: listings_found.clone(),
            ambiguous_dates: self.ambiguous_dates,
            target_property_id: target_property_id.map(str::to_string),
            imported_at: Utc::now(),
        };

        let outcome = ImportOutcome {
            platform,
            results: ImportResults {
                imported: self.imported,
                skipped: self.skipped,
                errors: self.errors.clone(),
                import_batch_id: self.batch_id,
                listings_found,
                ambiguous_dates: self.ambiguous_dates,
            },
            summary: ImportSummary {
                total: total_rows,
                imported: self.imported,
                skipped: self.skipped,
                errors: self.errors.len(),
            },
        };

        (batch, outcome)
    }
}

impl Default for ImportReporter {
    fn default() -> Self {
        Self::new()
    }
}
