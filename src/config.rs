// ==========================================
// Rental Ledger - Runtime Configuration
// ==========================================
// Upload guardrails. Values can be overridden per deployment;
// the defaults match the hosted product limits.
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportLimits {
    /// Maximum accepted upload size in bytes.
    pub max_file_bytes: usize,
    /// Maximum data rows per file (header excluded).
    pub max_rows: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024,
            max_rows: 5000,
        }
    }
}
