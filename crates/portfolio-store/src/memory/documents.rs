//! In-memory document store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::document::{DocumentStore, StoredDocument};
use crate::error::{StoreError, StoreResult};
use crate::ids::{OwnerId, RecordId};

/// collection -> id -> document
type Collections = HashMap<String, HashMap<RecordId, StoredDocument>>;

/// In-memory document store
///
/// Thread-safe via `RwLock`. Not persistent; data is lost on drop.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, HashMap::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()> {
        let mut collections = self.collections.write().map_err(|_| StoreError::poisoned())?;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.contains_key(&doc.id) {
            return Err(StoreError::Conflict(format!(
                "{collection} document {} already exists",
                doc.id
            )));
        }
        docs.insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn insert_if_owner_absent(
        &self,
        collection: &str,
        doc: StoredDocument,
    ) -> StoreResult<Option<StoredDocument>> {
        let mut collections = self.collections.write().map_err(|_| StoreError::poisoned())?;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = docs.values().find(|d| d.owner == doc.owner) {
            return Ok(Some(existing.clone()));
        }
        if docs.contains_key(&doc.id) {
            return Err(StoreError::Conflict(format!(
                "{collection} document {} already exists",
                doc.id
            )));
        }
        docs.insert(doc.id.clone(), doc);
        Ok(None)
    }

    async fn find_by_owner(
        &self,
        collection: &str,
        owner: &OwnerId,
    ) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().map_err(|_| StoreError::poisoned())?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| &doc.owner == owner)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_owned(
        &self,
        collection: &str,
        id: &RecordId,
        owner: &OwnerId,
    ) -> StoreResult<Option<StoredDocument>> {
        let collections = self.collections.read().map_err(|_| StoreError::poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .filter(|doc| &doc.owner == owner)
            .cloned())
    }

    async fn replace_owned(&self, collection: &str, doc: StoredDocument) -> StoreResult<bool> {
        let mut collections = self.collections.write().map_err(|_| StoreError::poisoned())?;
        match collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&doc.id))
        {
            Some(current) if current.owner == doc.owner => {
                *current = doc;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_owned(
        &self,
        collection: &str,
        id: &RecordId,
        owner: &OwnerId,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().map_err(|_| StoreError::poisoned())?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let owned = docs.get(id).is_some_and(|doc| &doc.owner == owner);
        if owned {
            docs.remove(id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn doc(id: &str, owner: &str) -> StoredDocument {
        let mut body = Map::new();
        body.insert("_id".into(), json!(id));
        body.insert("userId".into(), json!(owner));
        StoredDocument {
            id: RecordId::from(id),
            owner: OwnerId::from(owner),
            body,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryDocumentStore::new();
        store.insert("projects", doc("p1", "alice")).await.unwrap();
        store.insert("projects", doc("p2", "bob")).await.unwrap();
        store.insert("skills", doc("s1", "alice")).await.unwrap();

        let alice = OwnerId::from("alice");
        assert_eq!(store.find_by_owner("projects", &alice).await.unwrap().len(), 1);
        assert_eq!(store.find_by_owner("skills", &alice).await.unwrap().len(), 1);
        assert!(store.find_by_owner("experience", &alice).await.unwrap().is_empty());
        assert_eq!(store.count("projects"), 2);
    }

    #[tokio::test]
    async fn test_duplicate_id() {
        let store = InMemoryDocumentStore::new();
        store.insert("projects", doc("p1", "alice")).await.unwrap();
        let result = store.insert("projects", doc("p1", "alice")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let store = InMemoryDocumentStore::new();
        store.insert("projects", doc("p1", "alice")).await.unwrap();

        let id = RecordId::from("p1");
        let alice = OwnerId::from("alice");
        let bob = OwnerId::from("bob");

        assert!(store.find_owned("projects", &id, &bob).await.unwrap().is_none());
        assert!(!store.replace_owned("projects", doc("p1", "bob")).await.unwrap());
        assert!(!store.delete_owned("projects", &id, &bob).await.unwrap());

        assert!(store.find_owned("projects", &id, &alice).await.unwrap().is_some());
        assert!(store.replace_owned("projects", doc("p1", "alice")).await.unwrap());
        assert!(store.delete_owned("projects", &id, &alice).await.unwrap());
        assert!(!store.delete_owned("projects", &id, &alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_if_owner_absent() {
        let store = InMemoryDocumentStore::new();

        let first = store.insert_if_owner_absent("personal_info", doc("i1", "alice")).await;
        assert_eq!(first.unwrap(), None);

        let second = store
            .insert_if_owner_absent("personal_info", doc("i2", "alice"))
            .await
            .unwrap();
        assert_eq!(second.map(|d| d.id), Some(RecordId::from("i1")));

        let bob = store.insert_if_owner_absent("personal_info", doc("i3", "bob")).await;
        assert_eq!(bob.unwrap(), None);
        assert_eq!(store.count("personal_info"), 2);
    }
}
