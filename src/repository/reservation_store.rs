// ==========================================
// Rental Ledger - Reservation Store Interface
// ==========================================
// Storage seam for the import pipeline. No business rules here:
// the interface is data access only, scoped to one user on every
// call that touches user-owned rows.
// ==========================================

use crate::domain::property::{BillingConfiguration, Guest, Property};
use crate::domain::reservation::{CanonicalReservation, ImportBatch};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait ReservationStore: Send + Sync {
    // ===== Properties & billing =====

    /// All of a user's properties with their billing configuration
    /// (if any) attached. Loaded once per import run.
    async fn list_properties_with_billing(&self, user_id: &str) -> RepositoryResult<Vec<Property>>;

    /// Fresh billing lookup for one property.
    async fn find_billing_config(
        &self,
        property_id: &str,
    ) -> RepositoryResult<Option<BillingConfiguration>>;

    // ===== Guests =====

    async fn find_guest_by_email(
        &self,
        user_id: &str,
        email: &str,
    ) -> RepositoryResult<Option<Guest>>;

    /// Case-insensitive name match restricted to guests that have
    /// no email on record.
    async fn find_guest_by_name_without_email(
        &self,
        user_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<Guest>>;

    async fn create_guest(&self, guest: Guest) -> RepositoryResult<()>;

    // ===== Reservations =====

    async fn create_reservation(&self, reservation: CanonicalReservation)
        -> RepositoryResult<()>;

    /// Confirmation codes already present for a user, optionally
    /// narrowed to one billing configuration.
    async fn existing_confirmation_codes(
        &self,
        user_id: &str,
        billing_config_id: Option<&str>,
    ) -> RepositoryResult<HashSet<String>>;

    async fn find_reservations_by_batch(
        &self,
        user_id: &str,
        batch_id: &str,
    ) -> RepositoryResult<Vec<CanonicalReservation>>;

    // ===== Import audit =====

    async fn insert_import_batch(&self, batch: &ImportBatch) -> RepositoryResult<()>;

    /// Most recent batches first.
    async fn list_recent_batches(
        &self,
        user_id: &str,
        limit: usize,
    ) -> RepositoryResult<Vec<ImportBatch>>;
}
