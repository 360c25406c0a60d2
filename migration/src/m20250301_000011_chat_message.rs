use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000002_app_user::AppUser;

static IDX_CHAT_MESSAGE_SENDER_RECEIVER: &str = "idx-chat_message-sender_id-receiver_id";
static IDX_CHAT_MESSAGE_RECEIVER_ID: &str = "idx-chat_message-receiver_id";
static FK_CHAT_MESSAGE_SENDER_ID: &str = "fk-chat_message-sender_id";
static FK_CHAT_MESSAGE_RECEIVER_ID: &str = "fk-chat_message-receiver_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(ChatMessage::Id))
                    .col(integer(ChatMessage::SenderId))
                    .col(integer(ChatMessage::ReceiverId))
                    .col(string_len(ChatMessage::Content, 1000))
                    .col(boolean(ChatMessage::IsRead))
                    .col(timestamp(ChatMessage::SentAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHAT_MESSAGE_SENDER_ID)
                            .from(ChatMessage::Table, ChatMessage::SenderId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHAT_MESSAGE_RECEIVER_ID)
                            .from(ChatMessage::Table, ChatMessage::ReceiverId)
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
                    .name(IDX_CHAT_MESSAGE_SENDER_RECEIVER)
                    .table(ChatMessage::Table)
                    .col(ChatMessage::SenderId)
                    .col(ChatMessage::ReceiverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHAT_MESSAGE_RECEIVER_ID)
                    .table(ChatMessage::Table)
                    .col(ChatMessage::ReceiverId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CHAT_MESSAGE_RECEIVER_ID)
                    .table(ChatMessage::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CHAT_MESSAGE_SENDER_RECEIVER)
                    .table(ChatMessage::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ChatMessage::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ChatMessage {
    Table,
    Id,
    SenderId,
    ReceiverId,
    Content,
    IsRead,
    SentAt,
}
