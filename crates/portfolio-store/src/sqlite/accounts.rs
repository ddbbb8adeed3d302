//! SQLite account store

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

use super::schema::init_schema;
use crate::account::{Account, AccountStore, Role};
use crate::error::{StoreError, StoreResult};
use crate::ids::OwnerId;

const SELECT_ACCOUNT: &str =
    "SELECT id, username, email, password_hash, role, created_at FROM accounts";

/// SQLite-backed account store
///
/// Username and email uniqueness is enforced by the table constraints.
pub struct SqliteAccountStore {
    conn: Mutex<Connection>,
}

impl SqliteAccountStore {
    /// Open or create a database at the given path
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::poisoned())
    }

    fn query_one(
        &self,
        clause: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Option<Account>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(&format!("{SELECT_ACCOUNT} {clause}"), params, RawAccount::from_row)
            .optional()?;
        raw.map(RawAccount::into_account).transpose()
    }
}

/// Column values before parsing
struct RawAccount {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: String,
}

impl RawAccount {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_account(self) -> StoreResult<Account> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| StoreError::Corrupt(format!("account {}: role {}", self.id, self.role)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Corrupt(format!("account {}: {e}", self.id)))?
            .with_timezone(&Utc);

        Ok(Account {
            id: OwnerId::from(self.id),
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at,
        })
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<Account>> {
        self.query_one("WHERE username = ? OR email = ? LIMIT 1", (username, email))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.query_one("WHERE email = ?", [email])
    }

    async fn insert(&self, account: Account) -> StoreResult<()> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO accounts (id, username, email, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                account.id.as_str(),
                &account.username,
                &account.email,
                &account.password_hash,
                account.role.as_str(),
                account.created_at.to_rfc3339(),
            ),
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Conflict(format!(
                    "account {} / {}",
                    account.username, account.email
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}
