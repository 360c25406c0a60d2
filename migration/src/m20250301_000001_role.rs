use sea_orm_migration::{prelude::*, schema::*};

/// Role names seeded on creation, application code branches on these exact strings
const ROLE_NAMES: [&str; 4] = ["Admin", "Manager", "Technician", "Client"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(pk_auto(Role::Id))
                    .col(string_len_uniq(Role::Name, 32))
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert.into_table(Role::Table).columns([Role::Name]);
        for name in ROLE_NAMES {
            insert.values_panic([name.into()]);
        }

        manager.exec_stmt(insert.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Role {
    Table,
    Id,
    Name,
}
