pub mod auth;

pub use auth::{VerifiedIdentity, authenticate, require_auth};
