//! Record kinds
//!
//! Each kind is an explicit type that knows its collection, which
//! timestamps it carries, how to validate itself and how listings sort.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Number;

use crate::error::{StoreError, StoreResult};
use crate::ids::{OwnerId, RecordId};

/// Wire name of the record id
pub const ID_FIELD: &str = "_id";
/// Wire name of the owner id
pub const OWNER_FIELD: &str = "userId";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Fields only the server may set; dropped from client payloads
pub const PROTECTED_FIELDS: &[&str] = &[ID_FIELD, OWNER_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// A kind of owner-scoped record
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the records live in
    const COLLECTION: &'static str;
    /// Name used in messages ("Project not found")
    const LABEL: &'static str;
    /// Stamped with `createdAt` on insert
    const TRACKS_CREATED: bool;
    /// `updatedAt` refreshed on every write
    const TRACKS_UPDATED: bool;

    fn id(&self) -> &RecordId;

    fn owner(&self) -> &OwnerId;

    /// Reject missing required fields and pull values into range
    fn normalize(&mut self) -> StoreResult<()>;

    /// Listing order
    fn display_order(a: &Self, b: &Self) -> Ordering;
}

/// A kind with at most one record per owner, written by upsert
pub trait SingletonRecord: Record {}

/// Required text must be present and not blank
pub(crate) fn require_text(label: &str, field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!(
            "{label}: `{field}` is required"
        )));
    }
    Ok(())
}

/// Any JSON number as an integer: floats round, out-of-range values saturate
pub(crate) fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let n = Number::deserialize(deserializer)?;
    Ok(match (n.as_i64(), n.as_u64(), n.as_f64()) {
        (Some(i), _, _) => i,
        (None, Some(_), _) => i64::MAX,
        // `as` saturates at the i64 bounds
        (None, None, Some(f)) => f.round() as i64,
        (None, None, None) => 0,
    })
}
