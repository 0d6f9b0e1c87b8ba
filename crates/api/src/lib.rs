//! SnapBooth HTTP API.
//!
//! The binary in `main.rs` and the integration tests under `tests/` build
//! the same router from these modules.

pub mod auth;
pub mod config;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod invalidation;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
