use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000002_app_user::AppUser;

static IDX_NOTIFICATION_RECIPIENT_ID: &str = "idx-notification-recipient_id";
static FK_NOTIFICATION_RECIPIENT_ID: &str = "fk-notification-recipient_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(pk_auto(Notification::Id))
                    .col(integer(Notification::RecipientId))
                    .col(string_len(Notification::Message, 500))
                    .col(boolean(Notification::IsRead))
                    .col(timestamp(Notification::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_NOTIFICATION_RECIPIENT_ID)
                            .from(Notification::Table, Notification::RecipientId)
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
                    .name(IDX_NOTIFICATION_RECIPIENT_ID)
                    .table(Notification::Table)
                    .col(Notification::RecipientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_NOTIFICATION_RECIPIENT_ID)
                    .table(Notification::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Notification {
    Table,
    Id,
    RecipientId,
    Message,
    IsRead,
    CreatedAt,
}
