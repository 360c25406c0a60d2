//! Fixture helpers for inserting records and registering mock endpoints.
//!
//! - `user` - roles and users
//! - `order` - locations, orders, technician assignments, devices, maintenance logs, invoices
//! - `message` - notifications and chat messages
//! - `dropbox` - stored Dropbox tokens and mocked Dropbox HTTP endpoints

pub mod dropbox;
pub mod message;
pub mod order;
pub mod user;
