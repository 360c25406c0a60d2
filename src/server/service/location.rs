use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    model::{
        api::{PageDto, PageParams},
        location::{LocationDto, LocationFormDto},
        order::OrderStatus,
        user::Role,
    },
    server::{
        data::{
            location::LocationRepository, order::OrderRepository, user::UserRepository,
            Repository,
        },
        error::{auth::AuthError, Error},
        model::{auth::CurrentUser, db::LocationModel},
        service::CrudService,
    },
};

/// Client premises where systems are installed.
///
/// Admins and managers see every location, clients their own, technicians the locations of
/// orders they are assigned to.
pub struct LocationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LocationService<'a> {
    /// Creates a new instance of [`LocationService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    fn crud(&self) -> CrudService<'a, entity::location::Entity, LocationModel> {
        CrudService::new(self.db, "location")
    }

    pub async fn get_locations(
        &self,
        caller: &CurrentUser,
        params: PageParams,
    ) -> Result<PageDto<LocationDto>, Error> {
        let location_repo = LocationRepository::new(self.db);
        let (page, page_size) = (params.page(), params.page_size());

        let page = match caller.role {
            Role::Admin | Role::Manager => location_repo.get_page(page, page_size).await?,
            Role::Client => {
                location_repo
                    .get_page_for_client(caller.id, page, page_size)
                    .await?
            }
            Role::Technician => {
                location_repo
                    .get_page_for_technician(caller.id, page, page_size)
                    .await?
            }
        };

        Ok(page.try_map(LocationDto::try_from)?.into())
    }

    /// Fetches a location the caller may view; hidden locations are reported as not found
    pub async fn get_location(
        &self,
        caller: &CurrentUser,
        location_id: i32,
    ) -> Result<LocationDto, Error> {
        let location = self.crud().get_by_id(location_id).await?;

        let visible = match caller.role {
            Role::Admin | Role::Manager => true,
            Role::Client => location.client_id == caller.id,
            Role::Technician => {
                LocationRepository::new(self.db)
                    .is_technician_location(location_id, caller.id)
                    .await?
            }
        };

        if !visible {
            return Err(Error::not_found("location", location_id));
        }

        Ok(location.into())
    }

    /// Clients create locations for themselves; staff create them for the client named in
    /// `client_id`
    pub async fn create_location(
        &self,
        caller: &CurrentUser,
        dto: LocationFormDto,
    ) -> Result<LocationDto, Error> {
        let client_id = match caller.role {
            Role::Client => caller.id,
            Role::Admin | Role::Manager => {
                let client_id = dto.client_id.ok_or_else(|| {
                    Error::BadRequest(
                        "client_id is required when staff create a location".to_string(),
                    )
                })?;
                self.ensure_client(client_id).await?;
                client_id
            }
            Role::Technician => {
                return Err(AuthError::forbidden(caller.id, "create locations").into())
            }
        };

        let location = Repository::<_, entity::location::Entity>::new(self.db)
            .save(entity::location::ActiveModel {
                name: ActiveValue::Set(dto.name),
                address: ActiveValue::Set(dto.address),
                description: ActiveValue::Set(dto.description),
                client_id: ActiveValue::Set(client_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await?;

        Ok(location.into())
    }

    /// Owner or staff may edit; ownership never changes
    pub async fn update_location(
        &self,
        caller: &CurrentUser,
        location_id: i32,
        dto: LocationFormDto,
    ) -> Result<LocationDto, Error> {
        let location = self.find_manageable(caller, location_id).await?;

        let location = Repository::<_, entity::location::Entity>::new(self.db)
            .save(entity::location::ActiveModel {
                id: ActiveValue::Unchanged(location.id),
                name: ActiveValue::Set(dto.name),
                address: ActiveValue::Set(dto.address),
                description: ActiveValue::Set(dto.description),
                ..Default::default()
            })
            .await?;

        Ok(location.into())
    }

    /// Deleting a location also deletes its orders
    ///
    /// Only admins may delete a location with orders past `Pending`, matching the rule for
    /// deleting the orders themselves.
    pub async fn delete_location(
        &self,
        caller: &CurrentUser,
        location_id: i32,
    ) -> Result<(), Error> {
        self.find_manageable(caller, location_id).await?;

        if caller.role != Role::Admin {
            let started = OrderRepository::new(self.db)
                .count_at_location_not_in(location_id, OrderStatus::Pending.as_str())
                .await?;
            if started > 0 {
                return Err(AuthError::forbidden(
                    caller.id,
                    "delete a location with orders past pending",
                )
                .into());
            }
        }

        self.crud().delete(location_id).await
    }

    async fn find_manageable(
        &self,
        caller: &CurrentUser,
        location_id: i32,
    ) -> Result<LocationModel, Error> {
        let location = self.crud().get_by_id(location_id).await?;

        match caller.role {
            Role::Admin | Role::Manager => Ok(location),
            Role::Client if location.client_id == caller.id => Ok(location),
            Role::Client => Err(Error::not_found("location", location_id)),
            Role::Technician => Err(AuthError::forbidden(caller.id, "modify locations").into()),
        }
    }

    async fn ensure_client(&self, user_id: i32) -> Result<(), Error> {
        match UserRepository::new(self.db).get_with_role(user_id).await? {
            Some((_, Some(role))) if role.name == Role::Client.as_str() => Ok(()),
            Some(_) => Err(Error::BadRequest(format!("User {} is not a client", user_id))),
            None => Err(Error::not_found("user", user_id)),
        }
    }
}
