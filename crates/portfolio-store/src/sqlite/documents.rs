//! SQLite document store

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use serde_json::{Map, Value};

use super::schema::init_schema;
use crate::document::{DocumentStore, StoredDocument};
use crate::error::{StoreError, StoreResult};
use crate::ids::{OwnerId, RecordId};

/// SQLite-backed document store
///
/// Bodies are stored as JSON text next to indexed owner and id columns.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
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
}

fn encode_body(body: &Map<String, Value>) -> StoreResult<String> {
    serde_json::to_string(body).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn row_to_document(id: String, owner: String, body: String) -> StoreResult<StoredDocument> {
    let body: Map<String, Value> =
        serde_json::from_str(&body).map_err(|e| StoreError::Corrupt(format!("{id}: {e}")))?;
    Ok(StoredDocument {
        id: RecordId::from(id),
        owner: OwnerId::from(owner),
        body,
    })
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()> {
        let body = encode_body(&doc.body)?;
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO documents (collection, id, owner_id, body) VALUES (?, ?, ?, ?)",
            (collection, doc.id.as_str(), doc.owner.as_str(), &body),
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Conflict(format!(
                    "{collection} document {} already exists",
                    doc.id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_if_owner_absent(
        &self,
        collection: &str,
        doc: StoredDocument,
    ) -> StoreResult<Option<StoredDocument>> {
        let body = encode_body(&doc.body)?;
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front, so other connections to
        // the same file cannot slip an insert between the check and ours
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = tx
            .query_row(
                "SELECT id, owner_id, body FROM documents
                 WHERE collection = ? AND owner_id = ? LIMIT 1",
                (collection, doc.owner.as_str()),
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        if let Some((id, owner, body)) = existing {
            return row_to_document(id, owner, body).map(Some);
        }

        let result = tx.execute(
            "INSERT INTO documents (collection, id, owner_id, body) VALUES (?, ?, ?, ?)",
            (collection, doc.id.as_str(), doc.owner.as_str(), &body),
        );
        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StoreError::Conflict(format!(
                    "{collection} document {} already exists",
                    doc.id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit()?;
        Ok(None)
    }

    async fn find_by_owner(
        &self,
        collection: &str,
        owner: &OwnerId,
    ) -> StoreResult<Vec<StoredDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, body FROM documents WHERE collection = ? AND owner_id = ?",
        )?;

        let rows = stmt
            .query_map((collection, owner.as_str()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, owner, body)| row_to_document(id, owner, body))
            .collect()
    }

    async fn find_owned(
        &self,
        collection: &str,
        id: &RecordId,
        owner: &OwnerId,
    ) -> StoreResult<Option<StoredDocument>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, owner_id, body FROM documents
                 WHERE collection = ? AND id = ? AND owner_id = ?",
                (collection, id.as_str(), owner.as_str()),
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, owner, body)| row_to_document(id, owner, body))
            .transpose()
    }

    async fn replace_owned(&self, collection: &str, doc: StoredDocument) -> StoreResult<bool> {
        let body = encode_body(&doc.body)?;
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE documents SET body = ? WHERE collection = ? AND id = ? AND owner_id = ?",
            (&body, collection, doc.id.as_str(), doc.owner.as_str()),
        )?;
        Ok(updated > 0)
    }

    async fn delete_owned(
        &self,
        collection: &str,
        id: &RecordId,
        owner: &OwnerId,
    ) -> StoreResult<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM documents WHERE collection = ? AND id = ? AND owner_id = ?",
            (collection, id.as_str(), owner.as_str()),
        )?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, owner: &str, title: &str) -> StoredDocument {
        let mut body = Map::new();
        body.insert("_id".into(), json!(id));
        body.insert("userId".into(), json!(owner));
        body.insert("title".into(), json!(title));
        StoredDocument {
            id: RecordId::from(id),
            owner: OwnerId::from(owner),
            body,
        }
    }

    #[tokio::test]
    async fn test_sqlite_roundtrip() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        let d = doc("p1", "alice", "P1");
        store.insert("projects", d.clone()).await.unwrap();

        let found = store
            .find_owned("projects", &d.id, &d.owner)
            .await
            .unwrap();
        assert_eq!(found, Some(d));
    }

    #[tokio::test]
    async fn test_sqlite_insert_if_owner_absent() {
        let store = SqliteDocumentStore::in_memory().unwrap();

        let first = store
            .insert_if_owner_absent("personal_info", doc("i1", "alice", "A"))
            .await
            .unwrap();
        assert!(first.is_none());

        let second = store
            .insert_if_owner_absent("personal_info", doc("i2", "alice", "B"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.id.as_str(), "i1");
        assert_eq!(second.body["title"], "A");

        let alice = OwnerId::from("alice");
        assert_eq!(store.find_by_owner("personal_info", &alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_owner_scoping() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        store.insert("projects", doc("p1", "alice", "P1")).await.unwrap();

        let id = RecordId::from("p1");
        let bob = OwnerId::from("bob");
        assert!(store.find_owned("projects", &id, &bob).await.unwrap().is_none());
        assert!(!store.replace_owned("projects", doc("p1", "bob", "x")).await.unwrap());
        assert!(!store.delete_owned("projects", &id, &bob).await.unwrap());

        let alice = OwnerId::from("alice");
        assert!(store.replace_owned("projects", doc("p1", "alice", "P2")).await.unwrap());
        let found = store.find_owned("projects", &id, &alice).await.unwrap().unwrap();
        assert_eq!(found.body["title"], "P2");
        assert!(store.delete_owned("projects", &id, &alice).await.unwrap());
        assert!(store.find_by_owner("projects", &alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_duplicate_id() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        store.insert("projects", doc("p1", "alice", "P1")).await.unwrap();
        let result = store.insert("projects", doc("p1", "alice", "P1")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // Same id in another collection is fine
        store.insert("skills", doc("p1", "alice", "S")).await.unwrap();
    }
}
