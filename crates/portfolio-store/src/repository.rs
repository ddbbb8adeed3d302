//! Typed, ownership-scoped access to one record kind

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::document::{DocumentStore, StoredDocument};
use crate::error::{StoreError, StoreResult};
use crate::ids::{OwnerId, RecordId};
use crate::record::{
    CREATED_AT_FIELD, ID_FIELD, OWNER_FIELD, PROTECTED_FIELDS, Record, SingletonRecord,
    UPDATED_AT_FIELD,
};

/// What an upsert did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Replaced,
}

/// CRUD over one record kind, every write scoped to an owner
///
/// Payloads are client JSON objects. The owner always comes from the
/// caller's identity; `_id`, `userId` and timestamps in a payload are
/// ignored.
pub struct Repository<R> {
    store: Arc<dyn DocumentStore>,
    _kind: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<R: Record> Repository<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// All of `owner`'s records in display order; empty if none
    pub async fn list(&self, owner: &OwnerId) -> StoreResult<Vec<R>> {
        let mut records = self
            .store
            .find_by_owner(R::COLLECTION, owner)
            .await?
            .into_iter()
            .map(StoredDocument::decode::<R>)
            .collect::<StoreResult<Vec<R>>>()?;

        records.sort_by(R::display_order);
        Ok(records)
    }

    /// Create a record owned by `owner`
    pub async fn create(&self, owner: &OwnerId, payload: Value) -> StoreResult<R> {
        let record = new_record::<R>(owner, payload)?;
        self.store
            .insert(R::COLLECTION, StoredDocument::from_record(&record)?)
            .await?;

        tracing::debug!(kind = R::LABEL, id = %record.id(), owner = %owner, "created");
        Ok(record)
    }

    /// Merge `payload` into the record `(id, owner)` and return the result
    ///
    /// Someone else's record and a missing one both give `NotFound`.
    pub async fn update(&self, owner: &OwnerId, id: &RecordId, payload: Value) -> StoreResult<R> {
        let existing = self
            .store
            .find_owned(R::COLLECTION, id, owner)
            .await?
            .ok_or_else(not_found::<R>)?;

        let record = self.merge_and_replace(existing, payload).await?;
        tracing::debug!(kind = R::LABEL, id = %id, owner = %owner, "updated");
        Ok(record)
    }

    /// Hard-delete the record `(id, owner)`
    pub async fn delete(&self, owner: &OwnerId, id: &RecordId) -> StoreResult<()> {
        if !self.store.delete_owned(R::COLLECTION, id, owner).await? {
            return Err(not_found::<R>());
        }
        tracing::debug!(kind = R::LABEL, id = %id, owner = %owner, "deleted");
        Ok(())
    }

    async fn merge_and_replace(&self, existing: StoredDocument, payload: Value) -> StoreResult<R> {
        let fields = client_fields::<R>(payload)?;
        let mut body = existing.body;
        body.extend(fields);

        if R::TRACKS_UPDATED {
            let now = Utc::now();
            // Never move updatedAt backwards, even if the clock does
            let stamp = body
                .get(UPDATED_AT_FIELD)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|prev| prev.with_timezone(&Utc).max(now))
                .unwrap_or(now);
            body.insert(UPDATED_AT_FIELD.into(), timestamp(stamp));
        }

        let record = materialize::<R>(body)?;
        if !self
            .store
            .replace_owned(R::COLLECTION, StoredDocument::from_record(&record)?)
            .await?
        {
            // Deleted between lookup and write
            return Err(not_found::<R>());
        }
        Ok(record)
    }
}

impl<R: SingletonRecord> Repository<R> {
    /// The owner's record, if one exists
    pub async fn find_one(&self, owner: &OwnerId) -> StoreResult<Option<R>> {
        Ok(self.list(owner).await?.into_iter().next())
    }

    /// Create the owner's record if absent, otherwise merge into it
    ///
    /// Concurrent upserts for one owner never produce a second record: the
    /// create path inserts only if the owner still has none, and falls back
    /// to merging into whichever record won.
    pub async fn upsert(&self, owner: &OwnerId, payload: Value) -> StoreResult<(R, UpsertOutcome)> {
        let existing = self
            .store
            .find_by_owner(R::COLLECTION, owner)
            .await?
            .into_iter()
            .next();

        let existing = match existing {
            Some(doc) => doc,
            None => {
                let record = new_record::<R>(owner, payload.clone())?;
                match self
                    .store
                    .insert_if_owner_absent(R::COLLECTION, StoredDocument::from_record(&record)?)
                    .await?
                {
                    None => {
                        tracing::debug!(kind = R::LABEL, id = %record.id(), owner = %owner, "created");
                        return Ok((record, UpsertOutcome::Created));
                    }
                    Some(winner) => winner,
                }
            }
        };

        let record = self.merge_and_replace(existing, payload).await?;
        tracing::debug!(kind = R::LABEL, owner = %owner, "replaced");
        Ok((record, UpsertOutcome::Replaced))
    }
}

/// A fresh record for `owner` from client fields, with id and timestamps set
fn new_record<R: Record>(owner: &OwnerId, payload: Value) -> StoreResult<R> {
    let mut fields = client_fields::<R>(payload)?;
    let now = Utc::now();

    fields.insert(ID_FIELD.into(), Value::String(RecordId::generate().into_string()));
    fields.insert(OWNER_FIELD.into(), Value::String(owner.to_string()));
    if R::TRACKS_CREATED {
        fields.insert(CREATED_AT_FIELD.into(), timestamp(now));
    }
    if R::TRACKS_UPDATED {
        fields.insert(UPDATED_AT_FIELD.into(), timestamp(now));
    }

    materialize::<R>(fields)
}

fn not_found<R: Record>() -> StoreError {
    StoreError::NotFound(R::LABEL.to_string())
}

/// Payload object minus the server-controlled fields
fn client_fields<R: Record>(payload: Value) -> StoreResult<Map<String, Value>> {
    let Value::Object(mut fields) = payload else {
        return Err(StoreError::Validation(format!(
            "{}: request body must be a JSON object",
            R::LABEL
        )));
    };
    for field in PROTECTED_FIELDS {
        fields.remove(*field);
    }
    Ok(fields)
}

fn materialize<R: Record>(fields: Map<String, Value>) -> StoreResult<R> {
    let mut record: R = serde_json::from_value(Value::Object(fields))
        .map_err(|e| StoreError::Validation(format!("{}: {e}", R::LABEL)))?;
    record.normalize()?;
    Ok(record)
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}
