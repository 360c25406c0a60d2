use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000002_app_user::AppUser, m20250301_000004_security_system_order::SecuritySystemOrder,
};

static IDX_ORDER_TECHNICIAN_TECHNICIAN_ID: &str = "idx-order_technician-technician_id";
static FK_ORDER_TECHNICIAN_ORDER_ID: &str = "fk-order_technician-order_id";
static FK_ORDER_TECHNICIAN_TECHNICIAN_ID: &str = "fk-order_technician-technician_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderTechnician::Table)
                    .if_not_exists()
                    .col(integer(OrderTechnician::OrderId))
                    .col(integer(OrderTechnician::TechnicianId))
                    .col(timestamp(OrderTechnician::AssignedAt))
                    .primary_key(
                        Index::create()
                            .col(OrderTechnician::OrderId)
                            .col(OrderTechnician::TechnicianId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ORDER_TECHNICIAN_ORDER_ID)
                            .from(OrderTechnician::Table, OrderTechnician::OrderId)
                            .to(SecuritySystemOrder::Table, SecuritySystemOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ORDER_TECHNICIAN_TECHNICIAN_ID)
                            .from(OrderTechnician::Table, OrderTechnician::TechnicianId)
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
                    .name(IDX_ORDER_TECHNICIAN_TECHNICIAN_ID)
                    .table(OrderTechnician::Table)
                    .col(OrderTechnician::TechnicianId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ORDER_TECHNICIAN_TECHNICIAN_ID)
                    .table(OrderTechnician::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(OrderTechnician::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OrderTechnician {
    Table,
    OrderId,
    TechnicianId,
    AssignedAt,
}
