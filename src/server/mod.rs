//! Server application core modules.
//!
//! Repositories, services and HTTP controllers for the installation order platform, plus
//! startup wiring and the background Dropbox token refresh job.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;

#[cfg(test)]
pub(crate) mod util;
