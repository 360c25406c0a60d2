use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DropboxToken::Table)
                    .if_not_exists()
                    .col(pk_auto(DropboxToken::Id))
                    .col(text(DropboxToken::AccessToken))
                    .col(text(DropboxToken::RefreshToken))
                    .col(timestamp(DropboxToken::ExpiresAt))
                    .col(timestamp(DropboxToken::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DropboxToken::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum DropboxToken {
    Table,
    Id,
    AccessToken,
    RefreshToken,
    ExpiresAt,
    UpdatedAt,
}
