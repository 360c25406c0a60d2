//! API transport types.

pub mod api;
pub mod chat;
pub mod device;
pub mod invoice;
pub mod location;
pub mod maintenance;
pub mod notification;
pub mod order;
pub mod user;
