//! Installdesk: order, installation, maintenance and billing platform for security-system
//! installers.
//!
//! `model` holds the JSON transport types shared by every API route; `server` holds the
//! repositories, services, controllers and background jobs.

pub mod model;
pub mod server;
