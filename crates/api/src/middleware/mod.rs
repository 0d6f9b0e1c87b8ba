//! Request extractors that identify and authorize dashboard callers.

pub mod auth;
pub mod rbac;
