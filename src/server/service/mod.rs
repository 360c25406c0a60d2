//! Service layer for business logic.
//!
//! [`CrudService`] converts repository models into DTOs and turns missing rows into
//! `Error::NotFound`. The per-domain services build on it and apply role-based visibility
//! rules for the calling user.

pub mod auth;
pub mod chat;
pub mod device;
pub mod dropbox;
pub mod invoice;
pub mod location;
pub mod maintenance;
pub mod notification;
pub mod order;
pub mod user;

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};

use crate::{
    model::api::{PageDto, PageParams},
    server::{data::Repository, error::Error},
};

/// Generic read and delete operations returning `D` for entity `E`.
pub struct CrudService<'a, E, D> {
    db: &'a DatabaseConnection,
    name: &'static str,
    marker: PhantomData<(E, D)>,
}

impl<'a, E, D> CrudService<'a, E, D>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'a,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    D: TryFrom<E::Model>,
    Error: From<<D as TryFrom<E::Model>>::Error>,
{
    /// `name` is used in not-found messages, e.g. "invoice 7 not found"
    pub fn new(db: &'a DatabaseConnection, name: &'static str) -> Self {
        Self {
            db,
            name,
            marker: PhantomData,
        }
    }

    fn repository(&self) -> Repository<'a, DatabaseConnection, E> {
        Repository::new(self.db)
    }

    pub async fn get_all(&self) -> Result<Vec<D>, Error> {
        let models = self.repository().get_all().await?;

        Ok(models
            .into_iter()
            .map(D::try_from)
            .collect::<Result<Vec<D>, _>>()?)
    }

    /// # Returns
    /// - `Ok(D)` - Record found
    /// - `Err(Error::NotFound)` - No record with this id
    /// - `Err(Error::DbErr)` - Database query failed
    pub async fn get_by_id(&self, id: i32) -> Result<D, Error> {
        let Some(model) = self.repository().get_by_id(id).await? else {
            return Err(Error::not_found(self.name, id));
        };

        Ok(D::try_from(model)?)
    }

    pub async fn get_page(&self, params: PageParams) -> Result<PageDto<D>, Error> {
        let page = self
            .repository()
            .get_with_pagination(params.page(), params.page_size())
            .await?;

        Ok(page.try_map(D::try_from)?.into())
    }

    /// # Returns
    /// - `Ok(())` - Record deleted
    /// - `Err(Error::NotFound)` - No record with this id
    /// - `Err(Error::DbErr)` - Delete failed, e.g. a restricting foreign key
    pub async fn delete(&self, id: i32) -> Result<(), Error> {
        let result = self.repository().delete(id).await?;

        if result.rows_affected == 0 {
            return Err(Error::not_found(self.name, id));
        }

        Ok(())
    }
}
