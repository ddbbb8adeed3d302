//! In-memory implementations for tests and throwaway instances

mod accounts;
mod documents;

pub use accounts::InMemoryAccountStore;
pub use documents::InMemoryDocumentStore;
