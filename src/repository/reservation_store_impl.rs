// ==========================================
// Rental Ledger - Reservation Store (SQLite)
// ==========================================
// rusqlite-backed implementation behind a shared mutex-guarded
// connection. Data access only; no business rules live here.
// ==========================================

use crate::domain::property::{BillingConfiguration, Guest, Property};
use crate::domain::reservation::{CanonicalReservation, ImportBatch};
use crate::domain::types::Platform;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::reservation_store::ReservationStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ReservationStoreImpl
// ==========================================
pub struct ReservationStoreImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ReservationStoreImpl {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Open a database file and build a store on top of it.
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        Ok(Self::new(crate::db::open_database(db_path)?))
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

fn map_guest(row: &Row<'_>) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
    })
}

fn map_reservation(row: &Row<'_>) -> rusqlite::Result<CanonicalReservation> {
    let platform: String = row.get(3)?;
    Ok(CanonicalReservation {
        user_id: row.get(0)?,
        billing_config_id: row.get(1)?,
        confirmation_code: row.get(2)?,
        platform: Platform::parse(&platform),
        guest_name: row.get(4)?,
        guest_email: row.get(5)?,
        guest_id: row.get(6)?,
        check_in: row.get(7)?,
        check_out: row.get(8)?,
        nights: row.get(9)?,
        gross_amount: row.get(10)?,
        host_earnings: row.get(11)?,
        cleaning_fee: row.get(12)?,
        platform_service_fee: row.get(13)?,
        owner_amount: row.get(14)?,
        manager_amount: row.get(15)?,
        property_id: row.get(16)?,
        source_listing_name: row.get(17)?,
        import_batch_id: row.get(18)?,
        created_at: row.get(19)?,
    })
}

const RESERVATION_COLUMNS: &str = "user_id, billing_config_id, confirmation_code, platform, \
     guest_name, guest_email, guest_id, check_in, check_out, nights, \
     gross_amount, host_earnings, cleaning_fee, platform_service_fee, \
     owner_amount, manager_amount, property_id, source_listing_name, \
     import_batch_id, created_at";

#[async_trait]
impl ReservationStore for ReservationStoreImpl {
    async fn list_properties_with_billing(&self, user_id: &str) -> RepositoryResult<Vec<Property>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.user_id, p.name,
                    b.id, b.commission_percent, b.cleaning_fee
             FROM property p
             LEFT JOIN billing_config b ON b.property_id = p.id
             WHERE p.user_id = ?1
             ORDER BY p.name",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let billing_id: Option<String> = row.get(3)?;
            let billing = match billing_id {
                Some(id) => Some(BillingConfiguration {
                    id,
                    property_id: row.get(0)?,
                    commission_percent: row.get(4)?,
                    cleaning_fee: row.get(5)?,
                }),
                None => None,
            };
            Ok(Property {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                billing,
            })
        })?;
        let mut properties = Vec::new();
        for row in rows {
            properties.push(row?);
        }
        Ok(properties)
    }

    async fn find_billing_config(
        &self,
        property_id: &str,
    ) -> RepositoryResult<Option<BillingConfiguration>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, property_id, commission_percent, cleaning_fee
             FROM billing_config WHERE property_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![property_id], |row| {
            Ok(BillingConfiguration {
                id: row.get(0)?,
                property_id: row.get(1)?,
                commission_percent: row.get(2)?,
                cleaning_fee: row.get(3)?,
            })
        })?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn find_guest_by_email(
        &self,
        user_id: &str,
        email: &str,
    ) -> RepositoryResult<Option<Guest>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, email FROM guest
             WHERE user_id = ?1 AND email = ?2 COLLATE NOCASE",
        )?;
        let mut rows = stmt.query_map(params![user_id, email], map_guest)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn find_guest_by_name_without_email(
        &self,
        user_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<Guest>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, email FROM guest
             WHERE user_id = ?1 AND email IS NULL AND name = ?2 COLLATE NOCASE",
        )?;
        let mut rows = stmt.query_map(params![user_id, name], map_guest)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn create_guest(&self, guest: Guest) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO guest (id, user_id, name, email) VALUES (?1, ?2, ?3, ?4)",
            params![guest.id, guest.user_id, guest.name, guest.email],
        )?;
        Ok(())
    }

    async fn create_reservation(
        &self,
        reservation: CanonicalReservation,
    ) -> RepositoryResult<()> {
        let conn = self.lock()?;
        // OR REPLACE supports deliberate re-import of known codes
        // (skip-duplicates disabled): the record is rewritten in
        // place instead of failing on the identity key.
        conn.execute(
            "INSERT OR REPLACE INTO reservation (
                user_id, billing_config_id, confirmation_code, platform,
                guest_name, guest_email, guest_id, check_in, check_out, nights,
                gross_amount, host_earnings, cleaning_fee, platform_service_fee,
                owner_amount, manager_amount, property_id, source_listing_name,
                import_batch_id, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                       ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            params![
                reservation.user_id,
                reservation.billing_config_id,
                reservation.confirmation_code,
                reservation.platform.as_str(),
                reservation.guest_name,
                reservation.guest_email,
                reservation.guest_id,
                reservation.check_in,
                reservation.check_out,
                reservation.nights,
                reservation.gross_amount,
                reservation.host_earnings,
                reservation.cleaning_fee,
                reservation.platform_service_fee,
                reservation.owner_amount,
                reservation.manager_amount,
                reservation.property_id,
                reservation.source_listing_name,
                reservation.import_batch_id,
                reservation.created_at,
            ],
        )?;
        Ok(())
    }

    async fn existing_confirmation_codes(
        &self,
        user_id: &str,
        billing_config_id: Option<&str>,
    ) -> RepositoryResult<HashSet<String>> {
        let conn = self.lock()?;
        let mut codes = HashSet::new();
        match billing_config_id {
            Some(billing_id) => {
                let mut stmt = conn.prepare(
                    "SELECT confirmation_code FROM reservation
                     WHERE user_id = ?1 AND billing_config_id = ?2",
                )?;
                let rows = stmt.query_map(params![user_id, billing_id], |row| row.get(0))?;
                for row in rows {
                    codes.insert(row?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare("SELECT confirmation_code FROM reservation WHERE user_id = ?1")?;
                let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
                for row in rows {
                    codes.insert(row?);
                }
            }
        }
        Ok(codes)
    }

    async fn find_reservations_by_batch(
        &self,
        user_id: &str,
        batch_id: &str,
    ) -> RepositoryResult<Vec<CanonicalReservation>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservation
             WHERE user_id = ?1 AND import_batch_id = ?2
             ORDER BY check_in"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, batch_id], map_reservation)?;
        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?);
        }
        Ok(reservations)
    }

    async fn insert_import_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let errors_json = serde_json::to_string(&batch.errors)?;
        let listings_json = serde_json::to_string(&batch.listings_found)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO import_batch (
                batch_id, user_id, file_name, platform, total_rows,
                imported, skipped, error_count, errors_json, listings_json,
                ambiguous_dates, target_property_id, imported_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                batch.batch_id,
                batch.user_id,
                batch.file_name,
                batch.platform.as_str(),
                batch.total_rows as i64,
                batch.imported as i64,
                batch.skipped as i64,
                batch.error_count as i64,
                errors_json,
                listings_json,
                batch.ambiguous_dates as i64,
                batch.target_property_id,
                batch.imported_at,
            ],
        )?;
        Ok(())
    }

    async fn list_recent_batches(
        &self,
        user_id: &str,
        limit: usize,
    ) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT batch_id, user_id, file_name, platform, total_rows,
                    imported, skipped, error_count, errors_json, listings_json,
                    ambiguous_dates, target_property_id, imported_at
             FROM import_batch
             WHERE user_id = ?1
             ORDER BY imported_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            let platform: String = row.get(3)?;
            let errors_json: String = row.get(8)?;
            let listings_json: String = row.get(9)?;
            Ok((
                ImportBatch {
                    batch_id: row.get(0)?,
                    user_id: row.get(1)?,
                    file_name: row.get(2)?,
                    platform: Platform::parse(&platform),
                    total_rows: row.get::<_, i64>(4)? as usize,
                    imported: row.get::<_, i64>(5)? as usize,
                    skipped: row.get::<_, i64>(6)? as usize,
                    error_count: row.get::<_, i64>(7)? as usize,
                    errors: Vec::new(),
                    listings_found: Vec::new(),
                    ambiguous_dates: row.get::<_, i64>(10)? as usize,
                    target_property_id: row.get(11)?,
                    imported_at: row.get(12)?,
                },
                errors_json,
                listings_json,
            ))
        })?;

        let mut batches = Vec::new();
        for row in rows {
            let (mut batch, errors_json, listings_json) = row?;
            batch.errors = serde_json::from_str(&errors_json)?;
            batch.listings_found = serde_json::from_str(&listings_json)?;
            batches.push(batch);
        }
        Ok(batches)
    }
}
