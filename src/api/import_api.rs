// ==========================================
// Rental Ledger - Import API Surface
// ==========================================
// Outer entry points for uploads and import history. Owns the
// request-level concerns (rate limit, upload validation) and
// delegates the pipeline itself to the importer.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::rate_limit::{RateDecision, RateLimiter};
use crate::config::ImportLimits;
use crate::domain::reservation::{ImportBatch, ImportResults, ImportSummary};
use crate::domain::types::Platform;
use crate::importer::error::ImportError;
use crate::importer::reservation_importer_trait::{ImportRequest, ReservationImporter};
use crate::repository::reservation_store::ReservationStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// ImportResponse - success payload for one upload
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub platform: Platform,
    pub results: ImportResults,
    pub summary: ImportSummary,
}

pub struct ImportApi {
    importer: Arc<dyn ReservationImporter>,
    store: Arc<dyn ReservationStore>,
    rate_limiter: Arc<dyn RateLimiter>,
    limits: ImportLimits,
}

impl ImportApi {
    pub fn new(
        importer: Arc<dyn ReservationImporter>,
        store: Arc<dyn ReservationStore>,
        rate_limiter: Arc<dyn RateLimiter>,
        limits: ImportLimits,
    ) -> Self {
        Self {
            importer,
            store,
            rate_limiter,
            limits,
        }
    }

    /// Upload one reservation export.
    ///
    /// Validation order: rate limit, file extension, file size;
    /// everything past that point is the pipeline's concern.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, file_name = %request.file_name))]
    pub async fn import_csv(&self, request: ImportRequest) -> ApiResult<ImportResponse> {
        if let RateDecision::Limited { retry_after_secs } = self.rate_limiter.check(&request.user_id)
        {
            warn!(retry_after_secs, "upload rate limit hit");
            return Err(ApiError::rate_limited(
                "too many imports, try again later",
                retry_after_secs,
            ));
        }

        if !request.file_name.to_lowercase().ends_with(".csv") {
            return Err(ImportError::UnsupportedFileType(request.file_name.clone()).into());
        }
        if request.content.len() > self.limits.max_file_bytes {
            return Err(ImportError::FileTooLarge {
                size: request.content.len(),
                limit: self.limits.max_file_bytes,
            }
            .into());
        }

        let outcome = self.importer.import(request).await?;

        let message = format!(
            "imported {} reservations ({} skipped, {} errors)",
            outcome.summary.imported, outcome.summary.skipped, outcome.summary.errors
        );
        info!(
            batch_id = %outcome.results.import_batch_id,
            platform = outcome.platform.as_str(),
            "upload processed"
        );

        Ok(ImportResponse {
            success: true,
            message,
            platform: outcome.platform,
            results: outcome.results,
            summary: outcome.summary,
        })
    }

    /// Most recent import batches for a user, newest first.
    pub async fn import_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> ApiResult<Vec<ImportBatch>> {
        Ok(self.store.list_recent_batches(user_id, limit).await?)
    }
}
