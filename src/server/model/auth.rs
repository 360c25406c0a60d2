use crate::{model::user::Role, server::error::auth::AuthError};

/// Logged-in user resolved from the session for the current request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Fails with `AuthError::Forbidden` unless the user holds one of `roles`
    pub fn require_role(&self, roles: &[Role], action: &str) -> Result<(), AuthError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::forbidden(self.id, action))
        }
    }

    /// Fails with `AuthError::Forbidden` unless the user is an admin or manager
    pub fn require_staff(&self, action: &str) -> Result<(), AuthError> {
        self.require_role(&[Role::Admin, Role::Manager], action)
    }
}
