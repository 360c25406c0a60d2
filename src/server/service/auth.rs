//! Local username and password authentication.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveValue, DatabaseConnection, SqlErr};

use crate::{
    model::user::{LoginDto, RegisterDto, Role, UserDto},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, Error},
    },
};

/// Hashes a password with argon2id and a random salt, returning the PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt = [0u8; 16];
    rand::rng().fill(&mut salt);

    let salt = SaltString::encode_b64(&salt).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Malformed stored hashes never verify
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);

            false
        }
    }
}

/// Hash checked for unknown usernames so a login takes as long whether or not the user exists
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    DUMMY_HASH.get_or_init(|| hash_password("installdesk-unknown-user").unwrap_or_default())
}

/// Runs [`hash_password`] on the blocking thread pool
async fn hash_password_blocking(password: String) -> Result<String, Error> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::InternalError(format!("Password hashing task failed: {}", e)))??;

    Ok(hash)
}

/// Runs [`verify_password`] on the blocking thread pool, against the dummy hash when there is
/// no stored one
async fn verify_password_blocking(
    password: String,
    password_hash: Option<String>,
) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || match password_hash {
        Some(password_hash) => verify_password(&password, &password_hash),
        None => {
            verify_password(&password, dummy_hash());

            false
        }
    })
    .await
    .map_err(|e| Error::InternalError(format!("Password verification task failed: {}", e)))
}

/// Usernames are unique regardless of case and stored lowercase
fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}

fn username_taken(username: &str) -> Error {
    Error::Conflict(format!("Username {} is already taken", username))
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new client account.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - The created user with the `Client` role
    /// - `Err(Error::Conflict)` - Username is already taken
    /// - `Err(Error::InternalError)` - The `Client` role is missing from the database
    pub async fn register(&self, dto: RegisterDto) -> Result<UserDto, Error> {
        self.create_user(dto, Role::Client).await
    }

    async fn create_user(&self, dto: RegisterDto, role: Role) -> Result<UserDto, Error> {
        let user_repo = UserRepository::new(self.db);
        let username = normalize_username(&dto.username);

        if user_repo.find_by_username(&username).await?.is_some() {
            return Err(username_taken(&username));
        }

        let Some(role_model) = user_repo.get_role_by_name(role.as_str()).await? else {
            return Err(Error::InternalError(format!(
                "Role {} is not seeded in the database",
                role
            )));
        };

        let password_hash = hash_password_blocking(dto.password).await?;

        let created = user_repo
            .create(entity::app_user::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                email: ActiveValue::Set(dto.email),
                password_hash: ActiveValue::Set(password_hash),
                first_name: ActiveValue::Set(dto.first_name),
                last_name: ActiveValue::Set(dto.last_name),
                phone_number: ActiveValue::Set(dto.phone_number),
                role_id: ActiveValue::Set(role_model.id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await;

        let user = match created {
            Ok(user) => user,
            // Lost a race with a concurrent registration of the same name
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(username_taken(&username));
            }
            Err(e) => return Err(Error::DbErr(e)),
        };

        tracing::info!(user_id = user.id, role = %role, "Registered user {}", user.username);

        Ok(UserDto::from_models(user, &role_model)?)
    }

    /// Checks a username and password.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - Credentials are valid
    /// - `Err(Error::AuthError(AuthError::InvalidCredentials))` - Unknown user or wrong password
    pub async fn login(&self, dto: LoginDto) -> Result<UserDto, Error> {
        let found = UserRepository::new(self.db)
            .find_by_username(&normalize_username(&dto.username))
            .await?;

        let stored_hash = found.as_ref().map(|(user, _)| user.password_hash.clone());
        let verified = verify_password_blocking(dto.password, stored_hash).await?;

        let Some((user, role)) = found.filter(|_| verified) else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let role = role.ok_or_else(|| {
            Error::InternalError(format!("User {} has no role record", user.id))
        })?;

        Ok(UserDto::from_models(user, &role)?)
    }

    /// Creates an admin account with the given credentials unless the username exists.
    ///
    /// Returns `true` if the account was created.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, Error> {
        if UserRepository::new(self.db)
            .find_by_username(&normalize_username(username))
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let dto = RegisterDto {
            username: username.to_string(),
            password: password.to_string(),
            email: format!("{}@localhost", username),
            first_name: "Administrator".to_string(),
            last_name: username.to_string(),
            phone_number: None,
        };

        self.create_user(dto, Role::Admin).await?;

        Ok(true)
    }
}
