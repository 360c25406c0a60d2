use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250301_000002_app_user::AppUser, m20250301_000003_location::Location};

static IDX_ORDER_CLIENT_ID: &str = "idx-security_system_order-client_id";
static IDX_ORDER_LOCATION_ID: &str = "idx-security_system_order-location_id";
static FK_ORDER_CLIENT_ID: &str = "fk-security_system_order-client_id";
static FK_ORDER_LOCATION_ID: &str = "fk-security_system_order-location_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SecuritySystemOrder::Table)
                    .if_not_exists()
                    .col(pk_auto(SecuritySystemOrder::Id))
                    .col(string_len(SecuritySystemOrder::Title, 100))
                    .col(string_len(SecuritySystemOrder::Description, 1000))
                    .col(string_len(SecuritySystemOrder::PhoneNumber, 20))
                    .col(string_len(SecuritySystemOrder::Status, 16))
                    .col(date(SecuritySystemOrder::RequestedDate))
                    .col(integer(SecuritySystemOrder::LocationId))
                    .col(integer(SecuritySystemOrder::ClientId))
                    .col(timestamp(SecuritySystemOrder::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ORDER_LOCATION_ID)
                            .from(SecuritySystemOrder::Table, SecuritySystemOrder::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ORDER_CLIENT_ID)
                            .from(SecuritySystemOrder::Table, SecuritySystemOrder::ClientId)
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
                    .name(IDX_ORDER_CLIENT_ID)
                    .table(SecuritySystemOrder::Table)
                    .col(SecuritySystemOrder::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ORDER_LOCATION_ID)
                    .table(SecuritySystemOrder::Table)
                    .col(SecuritySystemOrder::LocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ORDER_LOCATION_ID)
                    .table(SecuritySystemOrder::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ORDER_CLIENT_ID)
                    .table(SecuritySystemOrder::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SecuritySystemOrder::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SecuritySystemOrder {
    Table,
    Id,
    Title,
    Description,
    PhoneNumber,
    Status,
    RequestedDate,
    LocationId,
    ClientId,
    CreatedAt,
}
