use chrono::Utc;
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    constant::{FIXTURE_PASSWORD_HASH, ROLE_NAMES},
    error::TestError,
    TestContext,
};

impl TestContext {
    pub fn user<'a>(&'a self) -> UserFixtures<'a> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> UserFixtures<'a> {
    pub(crate) async fn insert_roles(&self) -> Result<(), TestError> {
        let roles = ROLE_NAMES.iter().map(|name| entity::role::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            ..Default::default()
        });

        entity::prelude::Role::insert_many(roles)
            .exec(&self.setup.db)
            .await?;

        Ok(())
    }

    /// Id of the seeded role with the given name
    pub async fn role_id(&self, role: &str) -> Result<i32, TestError> {
        entity::prelude::Role::find()
            .filter(entity::role::Column::Name.eq(role))
            .one(&self.setup.db)
            .await?
            .map(|role| role.id)
            .ok_or_else(|| TestError::Fixture(format!("role {} is not seeded", role)))
    }

    /// Insert a user with placeholder profile fields and a password hash that never verifies.
    pub async fn insert_user(
        &self,
        username: &str,
        role: &str,
    ) -> Result<entity::app_user::Model, TestError> {
        let role_id = self.role_id(role).await?;

        Ok(
            entity::prelude::AppUser::insert(entity::app_user::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                email: ActiveValue::Set(format!("{}@example.com", username)),
                password_hash: ActiveValue::Set(FIXTURE_PASSWORD_HASH.to_string()),
                first_name: ActiveValue::Set("Test".to_string()),
                last_name: ActiveValue::Set(username.to_string()),
                phone_number: ActiveValue::Set(None),
                role_id: ActiveValue::Set(role_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Look up a user inserted through the builder
    pub async fn find_user(&self, username: &str) -> Result<entity::app_user::Model, TestError> {
        entity::prelude::AppUser::find()
            .filter(entity::app_user::Column::Username.eq(username))
            .one(&self.setup.db)
            .await?
            .ok_or_else(|| TestError::Fixture(format!("user {} was not inserted", username)))
    }
}
