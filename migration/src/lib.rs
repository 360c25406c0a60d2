pub use sea_orm_migration::prelude::*;

mod m20250301_000001_role;
mod m20250301_000002_app_user;
mod m20250301_000003_location;
mod m20250301_000004_security_system_order;
mod m20250301_000005_order_technician;
mod m20250301_000006_installed_device;
mod m20250301_000007_maintenance_log;
mod m20250301_000008_maintenance_device;
mod m20250301_000009_invoice;
mod m20250301_000010_notification;
mod m20250301_000011_chat_message;
mod m20250301_000012_dropbox_token;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_role::Migration),
            Box::new(m20250301_000002_app_user::Migration),
            Box::new(m20250301_000003_location::Migration),
            Box::new(m20250301_000004_security_system_order::Migration),
            Box::new(m20250301_000005_order_technician::Migration),
            Box::new(m20250301_000006_installed_device::Migration),
            Box::new(m20250301_000007_maintenance_log::Migration),
            Box::new(m20250301_000008_maintenance_device::Migration),
            Box::new(m20250301_000009_invoice::Migration),
            Box::new(m20250301_000010_notification::Migration),
            Box::new(m20250301_000011_chat_message::Migration),
            Box::new(m20250301_000012_dropbox_token::Migration),
        ]
    }
}
