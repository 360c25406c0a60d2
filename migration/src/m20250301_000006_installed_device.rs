use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000002_app_user::AppUser, m20250301_000004_security_system_order::SecuritySystemOrder,
};

static IDX_INSTALLED_DEVICE_ORDER_ID: &str = "idx-installed_device-order_id";
static FK_INSTALLED_DEVICE_ORDER_ID: &str = "fk-installed_device-order_id";
static FK_INSTALLED_DEVICE_INSTALLED_BY_ID: &str = "fk-installed_device-installed_by_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InstalledDevice::Table)
                    .if_not_exists()
                    .col(pk_auto(InstalledDevice::Id))
                    .col(string_len(InstalledDevice::DeviceType, 32))
                    .col(string_len(InstalledDevice::Brand, 50))
                    .col(string_len(InstalledDevice::Model, 50))
                    .col(integer(InstalledDevice::Quantity))
                    .col(date(InstalledDevice::DateInstalled))
                    .col(text_null(InstalledDevice::ImageUrl))
                    .col(integer(InstalledDevice::OrderId))
                    .col(integer_null(InstalledDevice::InstalledById))
                    .col(timestamp(InstalledDevice::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INSTALLED_DEVICE_ORDER_ID)
                            .from(InstalledDevice::Table, InstalledDevice::OrderId)
                            .to(SecuritySystemOrder::Table, SecuritySystemOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INSTALLED_DEVICE_INSTALLED_BY_ID)
                            .from(InstalledDevice::Table, InstalledDevice::InstalledById)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INSTALLED_DEVICE_ORDER_ID)
                    .table(InstalledDevice::Table)
                    .col(InstalledDevice::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_INSTALLED_DEVICE_ORDER_ID)
                    .table(InstalledDevice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(InstalledDevice::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum InstalledDevice {
    Table,
    Id,
    DeviceType,
    Brand,
    Model,
    Quantity,
    DateInstalled,
    ImageUrl,
    OrderId,
    InstalledById,
    CreatedAt,
}
