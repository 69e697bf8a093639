// ==========================================
// Rental Ledger - Reservation Importer Implementation
// ==========================================
// Orchestrates one upload end to end: tokenize, detect platform,
// resolve columns, then a sequential row loop where every row
// reaches exactly one terminal state. Row failures are recorded
// and the loop continues; only pre-loop validation and storage
// infrastructure failures abort the batch. The audit record is
// persisted whenever the row loop ran, even with zero imports.
// ==========================================

use crate::config::ImportLimits;
use crate::domain::property::Property;
use crate::domain::reservation::{CanonicalReservation, ImportOutcome};
use crate::domain::types::{Platform, RowErrorCategory, RowOutcome};
use crate::importer::billing::{billing_for, compute_split, match_property, round_cents};
use crate::importer::columns::{resolve_columns, ColumnIndexMap, SemanticField};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::identity::{
    email_from_contact, resolve_guest, synthesize_code, GUEST_NAME_FALLBACK,
};
use crate::importer::normalizer::{parse_date, resolve_nights};
use crate::importer::platform::{adapter_for, detect_platform};
use crate::importer::reporter::ImportReporter;
use crate::importer::reservation_importer_trait::{
    ImportRequest, PlatformAdapter, ReservationImporter,
};
use crate::importer::tokenizer::{tokenize, RawRow};
use crate::repository::error::RepositoryError;
use crate::repository::reservation_store::ReservationStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// Terminal state of one data row, before bookkeeping.
enum RowDisposition {
    Persisted { confirmation_code: String },
    Skipped(RowOutcome),
    RowError(RowErrorCategory, String),
}

// ==========================================
// BatchAccumulator - mutable intra-batch state
// ==========================================
// All state the row loop mutates, threaded through by reference
// so each row's processing is a function of (row, accumulator).
struct BatchAccumulator {
    /// User's properties; billing entries refresh in place.
    properties: Vec<Property>,
    /// Pre-loaded codes plus codes persisted earlier this run.
    seen_codes: HashSet<String>,
    reporter: ImportReporter,
}

pub struct ReservationImporterImpl {
    store: Arc<dyn ReservationStore>,
    limits: ImportLimits,
}

impl ReservationImporterImpl {
    pub fn new(store: Arc<dyn ReservationStore>, limits: ImportLimits) -> Self {
        Self { store, limits }
    }

    /// Process one data row to its terminal state. Storage errors
    /// bubble up and are converted to row-level unexpected errors
    /// by the caller, so one broken row cannot abort the batch.
    async fn process_row(
        &self,
        request: &ImportRequest,
        adapter: &dyn PlatformAdapter,
        cols: &ColumnIndexMap,
        row: &RawRow,
        acc: &mut BatchAccumulator,
    ) -> Result<RowDisposition, RepositoryError> {
        if !adapter.is_reservation_row(row, cols) {
            return Ok(RowDisposition::Skipped(RowOutcome::FilteredOut));
        }

        let listing_name = cols.value(row, SemanticField::ListingName);
        if let Some(listing) = listing_name {
            acc.reporter.record_listing(listing);
        }

        // Placeholder rows in exports leave the date cells empty.
        let (Some(check_in_raw), Some(check_out_raw)) = (
            cols.value(row, SemanticField::CheckIn),
            cols.value(row, SemanticField::CheckOut),
        ) else {
            return Ok(RowDisposition::Skipped(RowOutcome::MissingDates));
        };

        let (Some(check_in), Some(check_out)) =
            (parse_date(check_in_raw), parse_date(check_out_raw))
        else {
            return Ok(RowDisposition::RowError(
                RowErrorCategory::InvalidDates,
                format!("unparseable dates: '{check_in_raw}' / '{check_out_raw}'"),
            ));
        };
        if check_in.date >= check_out.date {
            return Ok(RowDisposition::RowError(
                RowErrorCategory::InvalidDates,
                format!(
                    "check-out {} not after check-in {}",
                    check_out.date, check_in.date
                ),
            ));
        }
        if check_in.ambiguous || check_out.ambiguous {
            acc.reporter.record_ambiguous_date();
        }

        let guest_name = cols
            .value(row, SemanticField::GuestName)
            .unwrap_or(GUEST_NAME_FALLBACK)
            .to_string();
        let guest_email = email_from_contact(cols.value(row, SemanticField::GuestContact));

        let confirmation_code = match cols.value(row, SemanticField::ConfirmationCode) {
            Some(code) => code.to_string(),
            None => synthesize_code(&guest_name, check_in.date, check_out.date),
        };

        if request.skip_duplicates && acc.seen_codes.contains(&confirmation_code) {
            return Ok(RowDisposition::Skipped(RowOutcome::Duplicate));
        }

        let matched = match_property(
            &acc.properties,
            request.target_property_id.as_deref(),
            listing_name,
        );
        let Some(property_id) = matched.map(|p| p.id.clone()) else {
            return Ok(RowDisposition::RowError(
                RowErrorCategory::UnmatchedProperty,
                format!(
                    "no property matched listing '{}'",
                    listing_name.unwrap_or("<none>")
                ),
            ));
        };

        let Some(billing) =
            billing_for(self.store.as_ref(), &mut acc.properties, &property_id).await?
        else {
            return Ok(RowDisposition::RowError(
                RowErrorCategory::UnmatchedProperty,
                format!("property {property_id} has no billing configuration"),
            ));
        };

        let amounts = adapter.extract_amounts(row, cols);
        // Cleaning fee is always the configured one, never a file column.
        let split = compute_split(
            amounts.host_earnings,
            billing.cleaning_fee,
            billing.commission_percent,
        );
        let nights = resolve_nights(
            cols.value(row, SemanticField::Nights),
            check_in.date,
            check_out.date,
        );

        let guest_id = resolve_guest(
            self.store.as_ref(),
            &request.user_id,
            &guest_name,
            guest_email.as_deref(),
        )
        .await?;

        let reservation = CanonicalReservation {
            confirmation_code: confirmation_code.clone(),
            platform: adapter.platform(),
            user_id: request.user_id.clone(),
            guest_name,
            guest_email,
            guest_id,
            check_in: check_in.date,
            check_out: check_out.date,
            nights,
            gross_amount: round_cents(amounts.gross_amount),
            host_earnings: round_cents(amounts.host_earnings),
            cleaning_fee: billing.cleaning_fee,
            platform_service_fee: round_cents(amounts.platform_service_fee),
            owner_amount: split.owner_amount,
            manager_amount: split.manager_amount,
            property_id,
            billing_config_id: billing.id,
            source_listing_name: listing_name.map(str::to_string),
            import_batch_id: acc.reporter.batch_id().to_string(),
            created_at: Utc::now(),
        };
        self.store.create_reservation(reservation).await?;

        Ok(RowDisposition::Persisted { confirmation_code })
    }
}

#[async_trait]
impl ReservationImporter for ReservationImporterImpl {
    #[instrument(skip(self, request), fields(user_id = %request.user_id, file_name = %request.file_name))]
    async fn import(&self, request: ImportRequest) -> ImportResult<ImportOutcome> {
        let rows = tokenize(&request.content);
        if rows.len() < 2 {
            return Err(ImportError::EmptyFile);
        }
        let data_rows = rows.len() - 1;
        if data_rows > self.limits.max_rows {
            return Err(ImportError::TooManyRows {
                rows: data_rows,
                limit: self.limits.max_rows,
            });
        }

        let headers = &rows[0];
        let platform = detect_platform(headers);
        let adapter = adapter_for(platform);
        let cols = resolve_columns(headers, adapter.column_candidates());
        if platform == Platform::Other {
            warn!("platform not recognized, using generic column set");
        }

        // Without both date columns nothing in the file is importable.
        if !cols.has(SemanticField::CheckIn) || !cols.has(SemanticField::CheckOut) {
            return Err(ImportError::MissingDateColumns {
                platform,
                headers: headers.clone(),
            });
        }

        let properties = self
            .store
            .list_properties_with_billing(&request.user_id)
            .await?;

        // Dedup scope narrows to the target property's billing
        // configuration when one is forced, so imports into one
        // property never shadow codes belonging to another.
        let scope_billing_id = request.target_property_id.as_deref().and_then(|target| {
            properties
                .iter()
                .find(|p| p.id == target)
                .and_then(|p| p.billing.as_ref().map(|b| b.id.clone()))
        });
        let seen_codes = self
            .store
            .existing_confirmation_codes(&request.user_id, scope_billing_id.as_deref())
            .await?;

        let mut acc = BatchAccumulator {
            properties,
            seen_codes,
            reporter: ImportReporter::new(),
        };
        info!(
            batch_id = %acc.reporter.batch_id(),
            platform = platform.as_str(),
            data_rows,
            "import batch started"
        );

        for (idx, row) in rows[1..].iter().enumerate() {
            // 1-based file position; the header is row 1.
            let row_number = idx + 2;

            let disposition = match self
                .process_row(&request, adapter, &cols, row, &mut acc)
                .await
            {
                Ok(d) => d,
                Err(err) => {
                    warn!(row_number, error = %err, "row failed unexpectedly");
                    RowDisposition::RowError(RowErrorCategory::Unexpected, err.to_string())
                }
            };

            match disposition {
                RowDisposition::Persisted { confirmation_code } => {
                    acc.seen_codes.insert(confirmation_code);
                    acc.reporter.record_imported();
                }
                RowDisposition::Skipped(_) => acc.reporter.record_skipped(),
                RowDisposition::RowError(category, reason) => {
                    let raw = serde_json::to_value(row).unwrap_or(serde_json::Value::Null);
                    acc.reporter.record_error(row_number, category, reason, raw);
                }
            }
        }

        let (batch, outcome) = acc.reporter.finish(
            &request.user_id,
            &request.file_name,
            platform,
            data_rows,
            request.target_property_id.as_deref(),
        );
        // Audit is unconditional once the loop ran.
        self.store.insert_import_batch(&batch).await?;

        info!(
            batch_id = %batch.batch_id,
            imported = batch.imported,
            skipped = batch.skipped,
            errors = batch.error_count,
            ambiguous_dates = batch.ambiguous_dates,
            "import batch finished"
        );

        Ok(outcome)
    }
}
