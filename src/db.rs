// ==========================================
// Rental Ledger - Database Bootstrap
// ==========================================
// SQLite connection setup and embedded schema. Dates are stored
// ISO-8601 as TEXT; enum-like fields store their canonical
// SCREAMING_SNAKE_CASE string; structured audit fields (row
// errors, listing list) are stored as JSON text.
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Embedded schema, applied idempotently at startup.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS property (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    name        TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_property_user ON property(user_id);

CREATE TABLE IF NOT EXISTS billing_config (
    id                  TEXT PRIMARY KEY,
    property_id         TEXT NOT NULL UNIQUE REFERENCES property(id),
    commission_percent  REAL NOT NULL,
    cleaning_fee        REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS guest (
    id       TEXT PRIMARY KEY,
    user_id  TEXT NOT NULL,
    name     TEXT NOT NULL,
    email    TEXT
);
CREATE INDEX IF NOT EXISTS idx_guest_user ON guest(user_id);

CREATE TABLE IF NOT EXISTS reservation (
    user_id               TEXT NOT NULL,
    billing_config_id     TEXT NOT NULL REFERENCES billing_config(id),
    confirmation_code     TEXT NOT NULL,
    platform              TEXT NOT NULL,
    guest_name            TEXT NOT NULL,
    guest_email           TEXT,
    guest_id              TEXT REFERENCES guest(id),
    check_in              TEXT NOT NULL,
    check_out             TEXT NOT NULL,
    nights                INTEGER NOT NULL,
    gross_amount          REAL NOT NULL,
    host_earnings         REAL NOT NULL,
    cleaning_fee          REAL NOT NULL,
    platform_service_fee  REAL NOT NULL,
    owner_amount          REAL NOT NULL,
    manager_amount        REAL NOT NULL,
    property_id           TEXT NOT NULL REFERENCES property(id),
    source_listing_name   TEXT,
    import_batch_id       TEXT NOT NULL,
    created_at            TEXT NOT NULL,
    PRIMARY KEY (user_id, billing_config_id, confirmation_code)
);
CREATE INDEX IF NOT EXISTS idx_reservation_batch ON reservation(import_batch_id);

CREATE TABLE IF NOT EXISTS import_batch (
    batch_id            TEXT PRIMARY KEY,
    user_id             TEXT NOT NULL,
    file_name           TEXT NOT NULL,
    platform            TEXT NOT NULL,
    total_rows          INTEGER NOT NULL,
    imported            INTEGER NOT NULL,
    skipped             INTEGER NOT NULL,
    error_count         INTEGER NOT NULL,
    errors_json         TEXT NOT NULL,
    listings_json       TEXT NOT NULL,
    ambiguous_dates     INTEGER NOT NULL,
    target_property_id  TEXT,
    imported_at         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_import_batch_user ON import_batch(user_id, imported_at);
"#;

/// Open a SQLite database, apply connection pragmas and the
/// schema, and hand back the shared connection handle.
pub fn open_database(db_path: &str) -> RepositoryResult<Arc<Mutex<Connection>>> {
    let conn = Connection::open(db_path)
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
    configure_connection(&conn)?;
    conn.execute_batch(SCHEMA)?;
    info!(db_path, "database opened");
    Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database with the same pragmas and schema.
pub fn open_in_memory() -> RepositoryResult<Arc<Mutex<Connection>>> {
    let conn = Connection::open_in_memory()
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
    configure_connection(&conn)?;
    conn.execute_batch(SCHEMA)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn configure_connection(conn: &Connection) -> RepositoryResult<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;
    Ok(())
}
