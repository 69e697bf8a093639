// ==========================================
// Rental Ledger - Property & Guest Entities
// ==========================================
// Entities owned by the storage collaborator; the pipeline
// only reads properties/billing and resolves or creates guests.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// BillingConfiguration - per-property billing terms
// ==========================================
// Must exist before any reservation can be created for the
// property. The cleaning fee here is the only cleaning fee the
// pipeline ever uses; exports are not trusted for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfiguration {
    pub id: String,
    pub property_id: String,
    /// Internal management fee rate applied to (host earnings - cleaning fee).
    pub commission_percent: f64,
    /// Flat per-stay cleaning fee.
    pub cleaning_fee: f64,
}

// ==========================================
// Property - a rental unit owned by a user
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub user_id: String,
    /// Canonical name, fuzzily matched against export listing names.
    pub name: String,
    /// Loaded together with the property; `None` until configured.
    pub billing: Option<BillingConfiguration>,
}

// ==========================================
// Guest - deduplicated guest identity
// ==========================================
// Scoped to a user. Matching on import: exact email first, then
// case-insensitive exact name among guests without an email on file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
}
