//! Domain logic shared by every SnapBooth crate.
//!
//! Nothing in here touches the database or the network: these modules hold
//! the types, validation rules, and normalization helpers that the
//! repository and HTTP layers build on.

pub mod analytics;
pub mod cache;
pub mod email;
pub mod error;
pub mod journey;
pub mod normalize;
pub mod roles;
pub mod settings;
pub mod storage;
pub mod types;
