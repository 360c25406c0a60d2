//! Typed session entries stored through tower-sessions.

pub mod user;
