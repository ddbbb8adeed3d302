//! SQLite persistence backends

mod accounts;
mod documents;
mod schema;

pub use accounts::SqliteAccountStore;
pub use documents::SqliteDocumentStore;
pub use schema::{SCHEMA_VERSION, init_schema};
