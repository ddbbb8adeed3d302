//! portfolio-server: REST backend for a personal portfolio site
//!
//! Public reads by owner id, bearer-token writes scoped to the caller.
//! Library half of the binary so integration tests can build the router.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
