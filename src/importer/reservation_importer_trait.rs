// ==========================================
// Rental Ledger - Importer Trait Interfaces
// ==========================================
// Interface definitions for the import pipeline seams
// (no implementations here).
// ==========================================

use crate::domain::reservation::ImportOutcome;
use crate::domain::types::Platform;
use crate::importer::columns::{ColumnIndexMap, FieldCandidates};
use crate::importer::error::ImportResult;
use crate::importer::tokenizer::RawRow;
use async_trait::async_trait;

// ==========================================
// ImportRequest - one upload
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Acting user, supplied by the authentication collaborator.
    pub user_id: String,
    pub file_name: String,
    /// Full decoded text content of the uploaded file.
    pub content: String,
    /// Forces property association for the entire batch.
    pub target_property_id: Option<String>,
    /// Default enabled; disabling re-imports known confirmation codes.
    pub skip_duplicates: bool,
}

impl ImportRequest {
    pub fn new(user_id: impl Into<String>, file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            file_name: file_name.into(),
            content: content.into(),
            target_property_id: None,
            skip_duplicates: true,
        }
    }
}

// ==========================================
// ReservationImporter Trait
// ==========================================
// Main import interface. One call processes one uploaded file:
// tokenize -> detect platform -> resolve columns -> sequential
// row loop -> audit record. Row-level failures never abort the
// batch; batch-fatal validation failures reject it before any
// row is processed.
#[async_trait]
pub trait ReservationImporter: Send + Sync {
    async fn import(&self, request: ImportRequest) -> ImportResult<ImportOutcome>;
}

// ==========================================
// PlatformAdapter Trait
// ==========================================
// One capability set per source platform: detection data, column
// map, row-type filter and amount extraction. Adding a platform
// means adding one adapter, not another conditional ladder.
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Phrases unique to this platform's export; any hit on a
    /// normalized header classifies the file immediately.
    fn marker_phrases(&self) -> &'static [&'static str];

    /// Weaker phrase indicators scored against the whole header
    /// set; two or more matches classifies the file.
    fn indicator_phrases(&self) -> &'static [&'static str];

    /// Ordered candidate substrings per semantic field.
    fn column_candidates(&self) -> &'static [FieldCandidates];

    /// Row-type filter: false marks a non-reservation ledger entry
    /// (payout, resolution, adjustment, credit) or a cancelled/
    /// no-show booking, which is skipped before any parsing.
    fn is_reservation_row(&self, row: &RawRow, cols: &ColumnIndexMap) -> bool;

    /// Platform-family financial semantics. The cleaning fee is
    /// deliberately absent here: it always comes from the property
    /// billing configuration, never from the file.
    fn extract_amounts(&self, row: &RawRow, cols: &ColumnIndexMap) -> PlatformAmounts;
}

// ==========================================
// PlatformAmounts - per-row financials from the export
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlatformAmounts {
    pub gross_amount: f64,
    pub host_earnings: f64,
    pub platform_service_fee: f64,
}
