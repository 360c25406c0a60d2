use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000006_installed_device::InstalledDevice,
    m20250301_000007_maintenance_log::MaintenanceLog,
};

static IDX_MAINTENANCE_DEVICE_LOG_ID: &str = "idx-maintenance_device-maintenance_log_id";
static FK_MAINTENANCE_DEVICE_LOG_ID: &str = "fk-maintenance_device-maintenance_log_id";
static FK_MAINTENANCE_DEVICE_DEVICE_ID: &str = "fk-maintenance_device-installed_device_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceDevice::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceDevice::Id))
                    .col(integer(MaintenanceDevice::MaintenanceLogId))
                    .col(integer(MaintenanceDevice::InstalledDeviceId))
                    .col(string_len_null(MaintenanceDevice::Notes, 500))
                    .col(boolean(MaintenanceDevice::RequireReplacement))
                    .col(boolean(MaintenanceDevice::IsFixed))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_DEVICE_LOG_ID)
                            .from(MaintenanceDevice::Table, MaintenanceDevice::MaintenanceLogId)
                            .to(MaintenanceLog::Table, MaintenanceLog::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_DEVICE_DEVICE_ID)
                            .from(MaintenanceDevice::Table, MaintenanceDevice::InstalledDeviceId)
                            .to(InstalledDevice::Table, InstalledDevice::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MAINTENANCE_DEVICE_LOG_ID)
                    .table(MaintenanceDevice::Table)
                    .col(MaintenanceDevice::MaintenanceLogId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MAINTENANCE_DEVICE_LOG_ID)
                    .table(MaintenanceDevice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MaintenanceDevice::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum MaintenanceDevice {
    Table,
    Id,
    MaintenanceLogId,
    InstalledDeviceId,
    Notes,
    RequireReplacement,
    IsFixed,
}
