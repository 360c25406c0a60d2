use std::collections::HashMap;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::{
        api::{PageDto, PageParams},
        user::{Role, UpdateProfileDto, UserDto},
    },
    server::{
        data::{
            invoice::InvoiceRepository, maintenance::MaintenanceRepository,
            order::OrderRepository, user::UserRepository,
        },
        error::Error,
        model::{
            auth::CurrentUser,
            db::{RoleModel, UserModel},
        },
        service::CrudService,
    },
};

/// Service for user accounts and roles.
pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the user behind a session.
    ///
    /// # Returns
    /// - `Ok(Some(CurrentUser))` - User exists
    /// - `Ok(None)` - User not found in database
    /// - `Err(Error::InternalError)` - User has no role record
    pub async fn get_current_user(&self, user_id: i32) -> Result<Option<CurrentUser>, Error> {
        let Some((user, role)) = UserRepository::new(self.db).get_with_role(user_id).await? else {
            return Ok(None);
        };

        let role = role.ok_or_else(|| {
            Error::InternalError(format!("User {} has no role record", user.id))
        })?;

        Ok(Some(CurrentUser {
            id: user.id,
            username: user.username,
            role: role.name.parse()?,
        }))
    }

    pub async fn get_user(&self, user_id: i32) -> Result<UserDto, Error> {
        let Some((user, role)) = UserRepository::new(self.db).get_with_role(user_id).await? else {
            return Err(Error::not_found("user", user_id));
        };

        Self::to_dto(user, role)
    }

    /// Paginated user list for admins and managers
    pub async fn get_users(
        &self,
        caller: &CurrentUser,
        params: PageParams,
    ) -> Result<PageDto<UserDto>, Error> {
        caller.require_staff("list users")?;

        let user_repo = UserRepository::new(self.db);
        let roles = self.roles_by_id().await?;
        let page = user_repo
            .get_page(params.page(), params.page_size())
            .await?;

        Ok(page
            .try_map(|user| {
                let role = roles.get(&user.role_id).cloned();
                Self::to_dto(user, role)
            })?
            .into())
    }

    /// Every technician, for staff assigning work
    pub async fn get_technicians(&self, caller: &CurrentUser) -> Result<Vec<UserDto>, Error> {
        caller.require_staff("list technicians")?;

        let roles = self.roles_by_id().await?;
        let technicians = UserRepository::new(self.db)
            .find_by_role_names(&[Role::Technician.as_str()])
            .await?;

        technicians
            .into_iter()
            .map(|user| {
                let role = roles.get(&user.role_id).cloned();
                Self::to_dto(user, role)
            })
            .collect()
    }

    /// Staff may view any user; everyone may view themselves
    pub async fn get_user_for(&self, caller: &CurrentUser, user_id: i32) -> Result<UserDto, Error> {
        if caller.id != user_id {
            caller.require_staff("view other users")?;
        }

        self.get_user(user_id).await
    }

    pub async fn update_profile(
        &self,
        caller: &CurrentUser,
        dto: UpdateProfileDto,
    ) -> Result<UserDto, Error> {
        let updated = UserRepository::new(self.db)
            .update_profile(
                caller.id,
                dto.email,
                dto.first_name,
                dto.last_name,
                dto.phone_number,
            )
            .await?;

        if updated.is_none() {
            return Err(Error::not_found("user", caller.id));
        }

        self.get_user(caller.id).await
    }

    /// Admin-only role change; admins cannot change their own role
    pub async fn change_role(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        role: Role,
    ) -> Result<UserDto, Error> {
        caller.require_role(&[Role::Admin], "change user roles")?;

        if caller.id == user_id {
            return Err(Error::BadRequest(
                "Admins cannot change their own role".to_string(),
            ));
        }

        let user_repo = UserRepository::new(self.db);
        let Some(role_model) = user_repo.get_role_by_name(role.as_str()).await? else {
            return Err(Error::InternalError(format!(
                "Role {} is not seeded in the database",
                role
            )));
        };

        let Some(user) = user_repo.update_role(user_id, role_model.id).await? else {
            return Err(Error::not_found("user", user_id));
        };

        tracing::info!(user_id = user.id, role = %role, "Changed user role");

        Self::to_dto(user, Some(role_model))
    }

    /// Admin-only delete.
    ///
    /// Users who still own orders or invoices, or who logged maintenance, cannot be deleted.
    pub async fn delete_user(&self, caller: &CurrentUser, user_id: i32) -> Result<(), Error> {
        caller.require_role(&[Role::Admin], "delete users")?;

        if caller.id == user_id {
            return Err(Error::BadRequest("Admins cannot delete themselves".to_string()));
        }

        let dependents = OrderRepository::new(self.db).count_for_client(user_id).await?
            + InvoiceRepository::new(self.db).count_for_client(user_id).await?
            + MaintenanceRepository::new(self.db)
                .count_for_technician(user_id)
                .await?;
        if dependents > 0 {
            return Err(Self::still_referenced(user_id));
        }

        let result = CrudService::<entity::app_user::Entity, UserModel>::new(self.db, "user")
            .delete(user_id)
            .await;

        // A row referencing the user may have been inserted since the count
        match result {
            Err(Error::DbErr(e)) if is_foreign_key_violation(&e) => {
                Err(Self::still_referenced(user_id))
            }
            other => other,
        }
    }

    fn still_referenced(user_id: i32) -> Error {
        Error::Conflict(format!(
            "User {} still has orders, invoices or maintenance logs",
            user_id
        ))
    }

    async fn roles_by_id(&self) -> Result<HashMap<i32, RoleModel>, Error> {
        let roles = UserRepository::new(self.db).get_roles().await?;

        Ok(roles.into_iter().map(|role| (role.id, role)).collect())
    }

    fn to_dto(user: UserModel, role: Option<RoleModel>) -> Result<UserDto, Error> {
        let role = role.ok_or_else(|| {
            Error::InternalError(format!("User {} has no role record", user.id))
        })?;

        Ok(UserDto::from_models(user, &role)?)
    }
}

pub(crate) fn is_foreign_key_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
