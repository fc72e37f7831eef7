use bookstore_db::{Record, RowId};
use bookstore_http::{FieldViolation, Validate};
use serde::{Deserialize, Serialize};

use crate::utils::{is_blank, null_as_empty};

/// Persisted book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: RowId,
    /// Fixed at creation
    pub title: String,
    pub description: String,
}

/// Book contents before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: String,
}

impl Record for Book {
    type Draft = NewBook;

    fn from_draft(id: RowId, draft: NewBook) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
        }
    }

    fn id(&self) -> RowId {
        self.id
    }
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateBookForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
}

impl Validate for CreateBookForm {
    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if is_blank(&self.title) {
            violations.push(FieldViolation::new(
                "title",
                "The title is required to create a new book.",
            ));
        }
        if is_blank(&self.description) {
            violations.push(FieldViolation::new(
                "description",
                "The description is required to create a new book.",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Request model for a partial book update. Only the description may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBookForm {
    pub description: Option<String>,
}

impl Validate for UpdateBookForm {
    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        Ok(())
    }
}

/// Outward-facing view of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: RowId,
    pub title: String,
    pub description: String,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            description: book.description,
        }
    }
}
