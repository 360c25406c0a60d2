use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000002_app_user::AppUser;

static IDX_LOCATION_CLIENT_ID: &str = "idx-location-client_id";
static FK_LOCATION_CLIENT_ID: &str = "fk-location-client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(pk_auto(Location::Id))
                    .col(string_len(Location::Name, 100))
                    .col(string_len(Location::Address, 200))
                    .col(string_len_null(Location::Description, 500))
                    .col(integer(Location::ClientId))
                    .col(timestamp(Location::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_LOCATION_CLIENT_ID)
                            .from(Location::Table, Location::ClientId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LOCATION_CLIENT_ID)
                    .table(Location::Table)
                    .col(Location::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_LOCATION_CLIENT_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Location {
    Table,
    Id,
    Name,
    Address,
    Description,
    ClientId,
    CreatedAt,
}
