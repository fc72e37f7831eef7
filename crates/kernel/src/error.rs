//! Resource error taxonomy shared by every CRUD module.
//!
//! A [`ResourceError`] carries a machine-readable code such as `UserNotFound`,
//! a human-readable message, and an [`ErrorStatus`]. Wire layers branch on the
//! status, never on the message text.

use std::fmt;

use thiserror::Error;

/// Status classification of a resource failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    /// Lookup by id or unique key found nothing.
    NotFound,
    /// A create violated a uniqueness constraint.
    Conflict,
    /// Persistence failed for any other reason.
    Internal,
}

/// Mutating operation that produced an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        };
        f.write_str(verb)
    }
}

/// Typed failure raised at the service boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ResourceError {
    code: String,
    message: String,
    status: ErrorStatus,
}

impl ResourceError {
    /// `<Resource>NotFound`
    pub fn not_found(resource: &str, message: impl Into<String>) -> Self {
        Self {
            code: format!("{resource}NotFound"),
            message: message.into(),
            status: ErrorStatus::NotFound,
        }
    }

    /// `<Resource>AlreadyExists`
    pub fn already_exists(resource: &str, message: impl Into<String>) -> Self {
        Self {
            code: format!("{resource}AlreadyExists"),
            message: message.into(),
            status: ErrorStatus::Conflict,
        }
    }

    /// `Create<Resource>Error`, `Update<Resource>Error` or `Delete<Resource>Error`
    pub fn internal(operation: Operation, resource: &str, message: impl Into<String>) -> Self {
        Self {
            code: format!("{operation}{resource}Error"),
            message: message.into(),
            status: ErrorStatus::Internal,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.status == ErrorStatus::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.status == ErrorStatus::Conflict
    }

    pub fn is_internal(&self) -> bool {
        self.status == ErrorStatus::Internal
    }

    /// Split into `(code, message)` for wire serialization.
    pub fn into_parts(self) -> (String, String) {
        (self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_uses_resource_prefix() {
        let err = ResourceError::not_found("User", "The user ID is not found in the database.");
        assert_eq!(err.code(), "UserNotFound");
        assert_eq!(err.status(), ErrorStatus::NotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn conflict_code_uses_already_exists_suffix() {
        let err = ResourceError::already_exists("User", "The user root already exists.");
        assert_eq!(err.code(), "UserAlreadyExists");
        assert!(err.is_conflict());
    }

    #[test]
    fn internal_codes_name_the_operation() {
        let create = ResourceError::internal(Operation::Create, "Book", "boom");
        let update = ResourceError::internal(Operation::Update, "Book", "boom");
        let delete = ResourceError::internal(Operation::Delete, "User", "boom");

        assert_eq!(create.code(), "CreateBookError");
        assert_eq!(update.code(), "UpdateBookError");
        assert_eq!(delete.code(), "DeleteUserError");
        assert!(create.is_internal() && update.is_internal() && delete.is_internal());
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = ResourceError::not_found("Book", "The book ID is not found in the database.");
        assert_eq!(
            err.to_string(),
            "BookNotFound: The book ID is not found in the database."
        );
    }
}
