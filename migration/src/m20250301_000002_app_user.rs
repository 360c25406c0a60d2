use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_role::Role;

static IDX_APP_USER_ROLE_ID: &str = "idx-app_user-role_id";
static FK_APP_USER_ROLE_ID: &str = "fk-app_user-role_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string_len_uniq(AppUser::Username, 50))
                    .col(string_len(AppUser::Email, 100))
                    .col(string(AppUser::PasswordHash))
                    .col(string_len(AppUser::FirstName, 50))
                    .col(string_len(AppUser::LastName, 50))
                    .col(string_len_null(AppUser::PhoneNumber, 20))
                    .col(integer(AppUser::RoleId))
                    .col(timestamp(AppUser::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_APP_USER_ROLE_ID)
                            .from(AppUser::Table, AppUser::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_APP_USER_ROLE_ID)
                    .table(AppUser::Table)
                    .col(AppUser::RoleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_APP_USER_ROLE_ID)
                    .table(AppUser::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum AppUser {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    PhoneNumber,
    RoleId,
    CreatedAt,
}
