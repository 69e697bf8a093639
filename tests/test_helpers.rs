// ==========================================
// Test Helpers
// ==========================================
// Shared fixtures: temporary database setup, seed data and
// CSV builders for the import tests.
// ==========================================
#![allow(dead_code)]

use rental_ledger::db;
use rental_ledger::repository::ReservationStoreImpl;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// Create a temporary database with the schema applied.
///
/// The NamedTempFile must be kept alive for the duration of the test.
pub fn create_test_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp db file");
    let db_path = temp_file
        .path()
        .to_str()
        .expect("temp path not utf-8")
        .to_string();
    let conn = db::open_database(&db_path).expect("Failed to open test db");
    (temp_file, conn)
}

/// Store on top of a shared test connection.
pub fn create_test_store(conn: &Arc<Mutex<Connection>>) -> Arc<ReservationStoreImpl> {
    Arc::new(ReservationStoreImpl::new(conn.clone()))
}

/// Insert a property with a billing configuration attached.
pub fn seed_property(
    conn: &Arc<Mutex<Connection>>,
    property_id: &str,
    user_id: &str,
    name: &str,
    commission_percent: f64,
    cleaning_fee: f64,
) {
    let guard = conn.lock().expect("db lock");
    guard
        .execute(
            "INSERT INTO property (id, user_id, name) VALUES (?1, ?2, ?3)",
            params![property_id, user_id, name],
        )
        .expect("Failed to insert property");
    guard
        .execute(
            "INSERT INTO billing_config (id, property_id, commission_percent, cleaning_fee)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                format!("bc-{property_id}"),
                property_id,
                commission_percent,
                cleaning_fee
            ],
        )
        .expect("Failed to insert billing config");
}

/// Insert a property that has no billing configuration.
pub fn seed_property_without_billing(
    conn: &Arc<Mutex<Connection>>,
    property_id: &str,
    user_id: &str,
    name: &str,
) {
    let guard = conn.lock().expect("db lock");
    guard
        .execute(
            "INSERT INTO property (id, user_id, name) VALUES (?1, ?2, ?3)",
            params![property_id, user_id, name],
        )
        .expect("Failed to insert property");
}

// ==========================================
// CSV builders
// ==========================================

pub const AIRBNB_HEADERS: &str = "Código de confirmación,Tipo,Fecha de inicio,Fecha de finalización,Noches,Nombre del viajero,Contacto,Anuncio,Tus ganancias";

/// One Airbnb-style reservation row.
pub fn airbnb_row(
    code: &str,
    check_in: &str,
    check_out: &str,
    nights: &str,
    guest: &str,
    contact: &str,
    listing: &str,
    earnings: &str,
) -> String {
    format!("{code},Reserva,{check_in},{check_out},{nights},{guest},{contact},{listing},\"{earnings}\"")
}

pub const BOOKING_HEADERS: &str = "Número de reserva,Nombre del cliente,Entrada,Salida,Duración,Estado,Precio,Importe de la comisión,Tipo de unidad";

pub fn booking_row(
    code: &str,
    guest: &str,
    check_in: &str,
    check_out: &str,
    nights: &str,
    status: &str,
    price: &str,
    commission: &str,
    unit: &str,
) -> String {
    format!("{code},{guest},{check_in},{check_out},{nights},{status},\"{price}\",\"{commission}\",{unit}")
}

pub fn csv_of(lines: &[&str]) -> String {
    lines.join("\n")
}
