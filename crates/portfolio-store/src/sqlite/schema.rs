//! SQLite schema definitions

use crate::error::StoreResult;
use rusqlite::Connection;

pub const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        -- Accounts
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,           -- PHC string
            role TEXT NOT NULL,                    -- "admin" | "user"
            created_at TEXT NOT NULL               -- RFC 3339
        );

        -- Owner-scoped records, one JSON body per row
        CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            owner_id TEXT NOT NULL,
            body TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_owner
            ON documents(collection, owner_id);
    "#,
    )?;

    // Set schema version
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Check schema version
#[cfg(test)]
pub fn check_version(conn: &Connection) -> StoreResult<u32> {
    let version: u32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);
    Ok(version)
}
