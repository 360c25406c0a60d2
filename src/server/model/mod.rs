//! Server-side models: application state, the authenticated caller, database model aliases
//! and typed session entries.

pub mod app;
pub mod auth;
pub mod db;
pub mod session;
