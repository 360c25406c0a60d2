//! Data access layer repositories.
//!
//! [`Repository`] provides the CRUD and pagination operations shared by every entity with an
//! integer primary key. Entity-specific repositories wrap it and add the queries their
//! services need, such as role-filtered listings.

pub mod chat;
pub mod device;
pub mod dropbox_token;
pub mod invoice;
pub mod location;
pub mod maintenance;
pub mod notification;
pub mod order;
pub mod user;

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, ItemsAndPagesNumber, Iterable, PaginatorTrait, PrimaryKeyToColumn,
    PrimaryKeyTrait, QueryOrder, Select,
};

use crate::model::api::PageDto;

/// One page of query results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Convert every item while keeping the page metadata
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<U>, E>>()?,
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        })
    }
}

impl<T> From<Page<T>> for PageDto<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        }
    }
}

/// CRUD and pagination for any entity whose primary key is built from an `i32`.
pub struct Repository<'a, C: ConnectionTrait, E: EntityTrait> {
    db: &'a C,
    entity: PhantomData<E>,
}

impl<'a, C, E> Repository<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'a,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    /// Creates a new instance of [`Repository`]
    pub fn new(db: &'a C) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    /// All rows ordered by primary key
    pub async fn get_all(&self) -> Result<Vec<E::Model>, DbErr> {
        Self::ordered(E::find()).all(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(self.db).await
    }

    /// Inserts the model when its primary key is unset, otherwise updates the existing row
    pub async fn save(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        let has_key = E::PrimaryKey::iter().all(|key| !model.get(key.into_column()).is_not_set());

        if has_key {
            model.update(self.db).await
        } else {
            model.insert(self.db).await
        }
    }

    /// Deletes a row by primary key
    ///
    /// Returns OK regardless of the row existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        E::delete_by_id(id).exec(self.db).await
    }

    /// Page `page` (1-based) of all rows ordered by primary key
    pub async fn get_with_pagination(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<Page<E::Model>, DbErr> {
        self.get_with_pagination_filtered(E::find(), page, page_size)
            .await
    }

    /// Page `page` (1-based) of an arbitrary query
    ///
    /// The primary key is appended as the last sort column so pages are stable.
    pub async fn get_with_pagination_filtered(
        &self,
        select: Select<E>,
        page: u64,
        page_size: u64,
    ) -> Result<Page<E::Model>, DbErr> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let paginator = Self::ordered(select).paginate(self.db, page_size);
        let ItemsAndPagesNumber {
            number_of_items,
            number_of_pages,
        } = paginator.num_items_and_pages().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items,
            page,
            page_size,
            total_items: number_of_items,
            total_pages: number_of_pages,
        })
    }

    fn ordered(select: Select<E>) -> Select<E> {
        E::PrimaryKey::iter().fold(select, |select, key| {
            select.order_by_asc(key.into_column())
        })
    }
}

#[cfg(test)]
mod tests {
    mod save {
        use chrono::Utc;
        use installdesk_test_utils::prelude::*;
        use sea_orm::ActiveValue;

        use crate::server::data::Repository;

        /// Expect a new row when the primary key is unset
        #[tokio::test]
        async fn inserts_new_row() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_app_tables()
                .with_user("client", ROLE_CLIENT)
                .build()
                .await?;
            let client = test.user().find_user("client").await?;

            let repo = Repository::<_, entity::location::Entity>::new(&test.db);
            let saved = repo
                .save(entity::location::ActiveModel {
                    name: ActiveValue::Set("Office".to_string()),
                    address: ActiveValue::Set("2 Main Road".to_string()),
                    description: ActiveValue::Set(None),
                    client_id: ActiveValue::Set(client.id),
                    created_at: ActiveValue::Set(Utc::now().naive_utc()),
                    ..Default::default()
                })
                .await?;

            assert!(repo.get_by_id(saved.id).await?.is_some());

            Ok(())
        }

        /// Expect an update of the existing row when the primary key is set
        #[tokio::test]
        async fn updates_existing_row() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_app_tables()
                .with_user("client", ROLE_CLIENT)
                .build()
                .await?;
            let client = test.user().find_user("client").await?;
            let location = test.order().insert_location(client.id).await?;

            let repo = Repository::<_, entity::location::Entity>::new(&test.db);
            let updated = repo
                .save(entity::location::ActiveModel {
                    id: ActiveValue::Unchanged(location.id),
                    name: ActiveValue::Set("Renamed".to_string()),
                    ..Default::default()
                })
                .await?;

            assert_eq!(updated.id, location.id);
            assert_eq!(updated.name, "Renamed");
            assert_eq!(updated.address, location.address);
            assert_eq!(repo.get_all().await?.len(), 1);

            Ok(())
        }
    }

    mod delete {
        use installdesk_test_utils::prelude::*;

        use crate::server::data::Repository;

        /// Expect one affected row for an existing record and none afterwards
        #[tokio::test]
        async fn reports_rows_affected() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_app_tables()
                .with_user("client", ROLE_CLIENT)
                .build()
                .await?;
            let client = test.user().find_user("client").await?;
            let notification = test.message().insert_notification(client.id, "hello").await?;

            let repo = Repository::<_, entity::notification::Entity>::new(&test.db);

            assert_eq!(repo.delete(notification.id).await?.rows_affected, 1);
            assert_eq!(repo.delete(notification.id).await?.rows_affected, 0);

            Ok(())
        }
    }

    mod get_with_pagination {
        use installdesk_test_utils::prelude::*;

        use crate::server::data::Repository;

        async fn setup_with_notifications(count: usize) -> Result<TestContext, TestError> {
            let test = TestBuilder::new()
                .with_app_tables()
                .with_user("client", ROLE_CLIENT)
                .build()
                .await?;
            let client = test.user().find_user("client").await?;

            for i in 0..count {
                test.message()
                    .insert_notification(client.id, &format!("message {}", i))
                    .await?;
            }

            Ok(test)
        }

        /// Expect the requested slice with totals for the whole table
        #[tokio::test]
        async fn returns_requested_page() -> Result<(), TestError> {
            let test = setup_with_notifications(25).await?;

            let repo = Repository::<_, entity::notification::Entity>::new(&test.db);
            let page = repo.get_with_pagination(3, 10).await?;

            assert_eq!(page.items.len(), 5);
            assert_eq!(page.page, 3);
            assert_eq!(page.total_items, 25);
            assert_eq!(page.total_pages, 3);
            assert_eq!(page.items[0].message, "message 20");

            Ok(())
        }

        /// Expect an empty page with correct totals beyond the last page
        #[tokio::test]
        async fn returns_empty_page_past_the_end() -> Result<(), TestError> {
            let test = setup_with_notifications(3).await?;

            let repo = Repository::<_, entity::notification::Entity>::new(&test.db);
            let page = repo.get_with_pagination(5, 10).await?;

            assert!(page.items.is_empty());
            assert_eq!(page.total_items, 3);
            assert_eq!(page.total_pages, 1);

            Ok(())
        }

        /// Expect an error when the table does not exist
        #[tokio::test]
        async fn fails_when_tables_missing() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            let repo = Repository::<_, entity::notification::Entity>::new(&test.db);
            let result = repo.get_with_pagination(1, 10).await;

            assert!(result.is_err());

            Ok(())
        }
    }
}
