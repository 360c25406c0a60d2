//! Database model type aliases.

pub type UserModel = entity::app_user::Model;
pub type RoleModel = entity::role::Model;
pub type LocationModel = entity::location::Model;
pub type OrderModel = entity::security_system_order::Model;
pub type DeviceModel = entity::installed_device::Model;
pub type MaintenanceLogModel = entity::maintenance_log::Model;
pub type MaintenanceDeviceModel = entity::maintenance_device::Model;
pub type InvoiceModel = entity::invoice::Model;
pub type NotificationModel = entity::notification::Model;
pub type ChatMessageModel = entity::chat_message::Model;
/// Single stored Dropbox OAuth token row
pub type DropboxTokenModel = entity::dropbox_token::Model;
