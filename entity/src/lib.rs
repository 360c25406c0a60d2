//! SeaORM entity definitions for the installdesk schema.

pub mod prelude;

pub mod app_user;
pub mod chat_message;
pub mod dropbox_token;
pub mod installed_device;
pub mod invoice;
pub mod location;
pub mod maintenance_device;
pub mod maintenance_log;
pub mod notification;
pub mod order_technician;
pub mod role;
pub mod security_system_order;
