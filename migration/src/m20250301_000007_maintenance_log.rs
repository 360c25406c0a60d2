use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000002_app_user::AppUser, m20250301_000004_security_system_order::SecuritySystemOrder,
};

static IDX_MAINTENANCE_LOG_ORDER_ID: &str = "idx-maintenance_log-order_id";
static IDX_MAINTENANCE_LOG_TECHNICIAN_ID: &str = "idx-maintenance_log-technician_id";
static FK_MAINTENANCE_LOG_ORDER_ID: &str = "fk-maintenance_log-order_id";
static FK_MAINTENANCE_LOG_TECHNICIAN_ID: &str = "fk-maintenance_log-technician_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceLog::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceLog::Id))
                    .col(string_len(MaintenanceLog::Description, 1000))
                    .col(date(MaintenanceLog::Date))
                    .col(boolean(MaintenanceLog::Resolved))
                    .col(integer(MaintenanceLog::OrderId))
                    .col(integer(MaintenanceLog::TechnicianId))
                    .col(timestamp(MaintenanceLog::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_LOG_ORDER_ID)
                            .from(MaintenanceLog::Table, MaintenanceLog::OrderId)
                            .to(SecuritySystemOrder::Table, SecuritySystemOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_LOG_TECHNICIAN_ID)
                            .from(MaintenanceLog::Table, MaintenanceLog::TechnicianId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MAINTENANCE_LOG_ORDER_ID)
                    .table(MaintenanceLog::Table)
                    .col(MaintenanceLog::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MAINTENANCE_LOG_TECHNICIAN_ID)
                    .table(MaintenanceLog::Table)
                    .col(MaintenanceLog::TechnicianId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MAINTENANCE_LOG_TECHNICIAN_ID)
                    .table(MaintenanceLog::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MAINTENANCE_LOG_ORDER_ID)
                    .table(MaintenanceLog::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MaintenanceLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum MaintenanceLog {
    Table,
    Id,
    Description,
    Date,
    Resolved,
    OrderId,
    TechnicianId,
    CreatedAt,
}
