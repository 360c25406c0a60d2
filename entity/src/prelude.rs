pub use super::app_user::Entity as AppUser;
pub use super::chat_message::Entity as ChatMessage;
pub use super::dropbox_token::Entity as DropboxToken;
pub use super::installed_device::Entity as InstalledDevice;
pub use super::invoice::Entity as Invoice;
pub use super::location::Entity as Location;
pub use super::maintenance_device::Entity as MaintenanceDevice;
pub use super::maintenance_log::Entity as MaintenanceLog;
pub use super::notification::Entity as Notification;
pub use super::order_technician::Entity as OrderTechnician;
pub use super::role::Entity as Role;
pub use super::security_system_order::Entity as SecuritySystemOrder;
