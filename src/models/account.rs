use std::fmt;

use crate::db::repositories::account::verify_password;
use crate::domain::OwnerId;
use crate::entities::users;

/// An account as seen by the rest of the application.
///
/// The password hash stays private: it can only be checked, never read back.
#[derive(Clone)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
    password_hash: String,
}

impl Account {
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        OwnerId::new(self.id)
    }

    /// Checks `candidate` against the stored Argon2 hash.
    ///
    /// Never fails: a malformed hash simply does not match. This is CPU bound;
    /// async callers should go through `AccountService::check_password`.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        verify_password(&self.password_hash, candidate)
    }
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            created_at: model.created_at,
            updated_at: model.updated_at,
            password_hash: model.password_hash,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .field("password_hash", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Optional attributes supplied alongside email and password on creation.
#[derive(Debug, Clone, Default)]
pub struct AccountExtra {
    pub name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Partial profile update; `None` leaves the field untouched.
#[derive(Default, Clone)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for ProfilePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfilePatch")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
