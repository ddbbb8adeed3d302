//! Untyped document store contract
//!
//! The store knows collections, ids and owners; it knows nothing about the
//! shape of a record. Typing, validation and ordering live in
//! [`crate::Repository`].

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::ids::{OwnerId, RecordId};
use crate::record::Record;

/// A record as the store sees it: keys plus a JSON object body
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: RecordId,
    pub owner: OwnerId,
    pub body: Map<String, Value>,
}

impl StoredDocument {
    /// Serialize a typed record into its stored form
    pub fn from_record<R: Record>(record: &R) -> StoreResult<Self> {
        match serde_json::to_value(record) {
            Ok(Value::Object(body)) => Ok(Self {
                id: record.id().clone(),
                owner: record.owner().clone(),
                body,
            }),
            Ok(other) => Err(StoreError::Corrupt(format!(
                "{} serialized to non-object {other}",
                R::LABEL
            ))),
            Err(e) => Err(StoreError::Corrupt(e.to_string())),
        }
    }

    /// Decode the body back into a typed record
    pub fn decode<R: Record>(self) -> StoreResult<R> {
        serde_json::from_value(Value::Object(self.body))
            .map_err(|e| StoreError::Corrupt(format!("{} {}: {e}", R::LABEL, self.id)))
    }
}

/// Collection-keyed document storage scoped by owner
///
/// Every lookup that can mutate takes both the record id and the owner id;
/// a record owned by someone else is indistinguishable from a missing one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document
    ///
    /// Returns `StoreError::Conflict` if the id is already used in the collection.
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()>;

    /// Store `doc` only if `doc.owner` has nothing in `collection` yet
    ///
    /// The check and the insert are one atomic step. Returns the owner's
    /// existing document, untouched, when there is one.
    async fn insert_if_owner_absent(
        &self,
        collection: &str,
        doc: StoredDocument,
    ) -> StoreResult<Option<StoredDocument>>;

    /// All documents in `collection` owned by `owner`, in no particular order
    async fn find_by_owner(
        &self,
        collection: &str,
        owner: &OwnerId,
    ) -> StoreResult<Vec<StoredDocument>>;

    /// The document with this id, if `owner` owns it
    async fn find_owned(
        &self,
        collection: &str,
        id: &RecordId,
        owner: &OwnerId,
    ) -> StoreResult<Option<StoredDocument>>;

    /// Overwrite the document matching `(doc.id, doc.owner)`
    ///
    /// Returns `false` when no such document exists.
    async fn replace_owned(&self, collection: &str, doc: StoredDocument) -> StoreResult<bool>;

    /// Remove the document matching `(id, owner)`
    ///
    /// Returns `false` when no such document exists.
    async fn delete_owned(
        &self,
        collection: &str,
        id: &RecordId,
        owner: &OwnerId,
    ) -> StoreResult<bool>;
}
