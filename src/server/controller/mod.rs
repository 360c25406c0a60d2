//! HTTP controller endpoints for the Installdesk API.
//!
//! Each handler resolves the logged-in user from the session, validates the request body and
//! delegates to a service. Handlers are documented with utoipa so every route shows up in the
//! generated OpenAPI document.

pub mod auth;
pub mod chat;
pub mod device;
pub mod invoice;
pub mod location;
pub mod maintenance;
pub mod notification;
pub mod order;
pub mod user;
pub mod util;
