use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::{
    data::{Page, Repository},
    model::db::{RoleModel, UserModel},
};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::app_user::Entity> {
        Repository::new(self.db)
    }

    pub async fn create(&self, user: entity::app_user::ActiveModel) -> Result<UserModel, DbErr> {
        self.base().save(user).await
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<UserModel>, DbErr> {
        self.base().get_by_id(user_id).await
    }

    /// Users with the given ids, in no particular order
    pub async fn get_many(&self, user_ids: &[i32]) -> Result<Vec<UserModel>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(entity::app_user::Column::Id.is_in(user_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// User together with their role
    pub async fn get_with_role(
        &self,
        user_id: i32,
    ) -> Result<Option<(UserModel, Option<RoleModel>)>, DbErr> {
        entity::prelude::AppUser::find_by_id(user_id)
            .find_also_related(entity::role::Entity)
            .one(self.db)
            .await
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(UserModel, Option<RoleModel>)>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(entity::app_user::Column::Username.eq(username))
            .find_also_related(entity::role::Entity)
            .one(self.db)
            .await
    }

    pub async fn get_page(&self, page: u64, page_size: u64) -> Result<Page<UserModel>, DbErr> {
        self.base().get_with_pagination(page, page_size).await
    }

    /// Users holding any of the named roles, ordered by username
    pub async fn find_by_role_names(&self, roles: &[&str]) -> Result<Vec<UserModel>, DbErr> {
        entity::prelude::AppUser::find()
            .inner_join(entity::role::Entity)
            .filter(entity::role::Column::Name.is_in(roles.iter().copied()))
            .order_by_asc(entity::app_user::Column::Username)
            .all(self.db)
            .await
    }

    /// Updates the profile fields a user may change themselves
    ///
    /// Returns `None` if the user does not exist.
    pub async fn update_profile(
        &self,
        user_id: i32,
        email: String,
        first_name: String,
        last_name: String,
        phone_number: Option<String>,
    ) -> Result<Option<UserModel>, DbErr> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(None);
        };

        let mut user_am = user.into_active_model();
        user_am.email = ActiveValue::Set(email);
        user_am.first_name = ActiveValue::Set(first_name);
        user_am.last_name = ActiveValue::Set(last_name);
        user_am.phone_number = ActiveValue::Set(phone_number);

        Ok(Some(user_am.update(self.db).await?))
    }

    pub async fn update_role(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<Option<UserModel>, DbErr> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(None);
        };

        let mut user_am = user.into_active_model();
        user_am.role_id = ActiveValue::Set(role_id);

        Ok(Some(user_am.update(self.db).await?))
    }

    pub async fn delete(&self, user_id: i32) -> Result<sea_orm::DeleteResult, DbErr> {
        self.base().delete(user_id).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<RoleModel>, DbErr> {
        entity::prelude::Role::find()
            .filter(entity::role::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn get_roles(&self) -> Result<Vec<RoleModel>, DbErr> {
        Repository::<C, entity::role::Entity>::new(self.db)
            .get_all()
            .await
    }
}
