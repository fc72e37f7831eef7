use std::fmt;

use bookstore_db::{Record, RowId};
use bookstore_http::{FieldViolation, Validate};
use serde::{Deserialize, Serialize};

use crate::utils::{is_blank, is_valid_email, null_as_empty};

const INVALID_EMAIL: &str = "The email is not valid";

/// Persisted user record. The plaintext password is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: RowId,
    /// Unique across the table and fixed at creation
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// User contents before the store assigns an id.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl Record for User {
    type Draft = NewUser;

    fn from_draft(id: RowId, draft: NewUser) -> Self {
        Self {
            id,
            username: draft.username,
            email: draft.email,
            password_hash: draft.password_hash,
        }
    }

    fn id(&self) -> RowId {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.username)
    }
}

/// Request model for creating a new user.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

impl Validate for CreateUserForm {
    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if is_blank(&self.username) {
            violations.push(FieldViolation::new(
                "username",
                "The username is required to create a new user",
            ));
        }
        if is_blank(&self.email) {
            violations.push(FieldViolation::new(
                "email",
                "The email is required to create a new user",
            ));
        } else if !is_valid_email(&self.email) {
            violations.push(FieldViolation::new("email", INVALID_EMAIL));
        }
        if is_blank(&self.password) {
            violations.push(FieldViolation::new(
                "password",
                "The password is required to create a new user",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Request model for a partial user update. The username never changes.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for UpdateUserForm {
    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() && !is_valid_email(email) => {
                Err(vec![FieldViolation::new("email", INVALID_EMAIL)])
            }
            _ => Ok(()),
        }
    }
}

/// Outward-facing view of a user; never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: RowId,
    pub username: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// What an authentication collaborator may learn about a user.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub username: String,
    pub password_hash: String,
}

impl From<User> for UserCredentials {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            password_hash: user.password_hash,
        }
    }
}
