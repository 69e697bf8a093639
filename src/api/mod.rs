// ==========================================
// Rental Ledger - API Layer
// ==========================================

pub mod error;
pub mod import_api;
pub mod rate_limit;

pub use error::{ApiError, ApiResult, ErrorEnvelope, ErrorStatus};
pub use import_api::{ImportApi, ImportResponse};
pub use rate_limit::{FixedWindowRateLimiter, RateDecision, RateLimiter};
