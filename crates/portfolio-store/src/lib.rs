//! portfolio-store: ownership-scoped storage for portfolio records
//!
//! Every record belongs to exactly one account. Reads by owner are public;
//! writes go through [`Repository`], which matches on `(record id, owner)`
//! so one account can never touch another's rows.
//!
//! ## Backends
//!
//! | Backend                  | Use Case                  | Feature Flag |
//! |--------------------------|---------------------------|--------------|
//! | `InMemoryDocumentStore`  | Tests, demo instances     | (always)     |
//! | `InMemoryAccountStore`   | Tests, demo instances     | (always)     |
//! | `SqliteDocumentStore`    | Single-node persistence   | `sqlite`     |
//! | `SqliteAccountStore`     | Single-node persistence   | `sqlite`     |
//! | `InMemoryUploadStorage`  | Tests                     | (always)     |
//! | `LocalUploadStorage`     | Image uploads on disk     | (always)     |
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use portfolio_store::{InMemoryDocumentStore, OwnerId, Project, Repository};
//!
//! let projects = Repository::<Project>::new(Arc::new(InMemoryDocumentStore::new()));
//! let owner = OwnerId::generate();
//!
//! let created = projects
//!     .create(&owner, serde_json::json!({ "title": "P1", "description": "D1" }))
//!     .await?;
//! assert!(created.tech_stack.is_empty());
//! assert_eq!(projects.list(&owner).await?.len(), 1);
//! ```

mod account;
mod document;
mod error;
mod ids;
mod record;
mod records;
mod repository;

pub mod memory;
pub mod uploads;

#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-exports
pub use account::{Account, AccountStore, Role};
pub use document::{DocumentStore, StoredDocument};
pub use error::{StoreError, StoreResult};
pub use ids::{OwnerId, RecordId};
pub use record::{Record, SingletonRecord};
pub use records::{Experience, PersonalInfo, Project, Skill, SkillCategory};
pub use repository::{Repository, UpsertOutcome};
pub use uploads::{InMemoryUploadStorage, LocalUploadStorage, StoredImage, UploadStorage};

pub use memory::{InMemoryAccountStore, InMemoryDocumentStore};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteAccountStore, SqliteDocumentStore};
