use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000002_app_user::AppUser, m20250301_000004_security_system_order::SecuritySystemOrder,
};

static IDX_INVOICE_ORDER_ID: &str = "idx-invoice-order_id";
static IDX_INVOICE_CLIENT_ID: &str = "idx-invoice-client_id";
static FK_INVOICE_ORDER_ID: &str = "fk-invoice-order_id";
static FK_INVOICE_CLIENT_ID: &str = "fk-invoice-client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoice::Table)
                    .if_not_exists()
                    .col(pk_auto(Invoice::Id))
                    .col(string_len(Invoice::Title, 100))
                    .col(text_null(Invoice::Description))
                    .col(decimal_len(Invoice::Amount, 12, 2))
                    .col(date(Invoice::IssuedOn))
                    .col(boolean(Invoice::IsPaid))
                    .col(integer(Invoice::OrderId))
                    .col(integer(Invoice::ClientId))
                    .col(timestamp(Invoice::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INVOICE_ORDER_ID)
                            .from(Invoice::Table, Invoice::OrderId)
                            .to(SecuritySystemOrder::Table, SecuritySystemOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INVOICE_CLIENT_ID)
                            .from(Invoice::Table, Invoice::ClientId)
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
                    .name(IDX_INVOICE_ORDER_ID)
                    .table(Invoice::Table)
                    .col(Invoice::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INVOICE_CLIENT_ID)
                    .table(Invoice::Table)
                    .col(Invoice::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_INVOICE_CLIENT_ID)
                    .table(Invoice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_INVOICE_ORDER_ID)
                    .table(Invoice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Invoice::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Invoice {
    Table,
    Id,
    Title,
    Description,
    Amount,
    IssuedOn,
    IsPaid,
    OrderId,
    ClientId,
    CreatedAt,
}
