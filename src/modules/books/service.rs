//! Book use-case service.
//!
//! Owns every business rule between the HTTP handlers and the store and is
//! the only place book failures are classified into [`ResourceError`]s.

use std::sync::Arc;

use bookstore_db::{RowId, StoreError};
use bookstore_kernel::{Operation, ResourceError};

use super::models::{Book, CreateBookForm, NewBook, UpdateBookForm};
use super::repository::BookRepository;
use crate::utils::patch_value;

const RESOURCE: &str = "Book";

pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// All stored books; an empty store yields an empty list.
    pub async fn list_all(&self) -> Vec<Book> {
        tracing::debug!("fetching all books");
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, book_id: RowId) -> Result<Book, ResourceError> {
        tracing::debug!(book_id, "fetching book by id");
        self.repository
            .find_by_id(book_id)
            .await
            .ok_or_else(|| {
                ResourceError::not_found(RESOURCE, "The book ID is not found in the database.")
            })
    }

    pub async fn create(&self, form: CreateBookForm) -> Result<Book, ResourceError> {
        tracing::debug!(title = %form.title, "creating book");
        let draft = NewBook {
            title: form.title,
            description: form.description,
        };
        let title = draft.title.clone();

        match self.repository.insert(draft).await {
            Ok(book) => {
                tracing::info!(book_id = book.id, "book created");
                Ok(book)
            }
            Err(err @ StoreError::UniqueViolation { .. }) => {
                tracing::warn!(error = %err, "book already exists");
                Err(ResourceError::already_exists(
                    RESOURCE,
                    format!("The book '{title}' already exists."),
                ))
            }
            Err(err) => {
                tracing::error!(error = %err, "error creating book");
                Err(ResourceError::internal(
                    Operation::Create,
                    RESOURCE,
                    format!("Error while creating the book '{title}."),
                ))
            }
        }
    }

    /// Applies only the non-empty fields of `form`; the title never changes.
    pub async fn update_by_id(
        &self,
        book_id: RowId,
        form: UpdateBookForm,
    ) -> Result<Book, ResourceError> {
        tracing::info!(book_id, "updating book");
        let mut book = self.get_by_id(book_id).await?;

        if let Some(description) = patch_value(form.description) {
            book.description = description;
        }

        match self.repository.save(book).await {
            Ok(updated) => {
                tracing::info!(book_id = updated.id, "book updated");
                Ok(updated)
            }
            Err(err) => {
                tracing::error!(book_id, error = %err, "error updating book");
                Err(ResourceError::internal(
                    Operation::Update,
                    RESOURCE,
                    format!("Error while updating the book with the ID '{book_id}."),
                ))
            }
        }
    }

    pub async fn delete_by_id(&self, book_id: RowId) -> Result<(), ResourceError> {
        tracing::info!(book_id, "deleting book");
        let book = self.get_by_id(book_id).await?;

        match self.repository.delete(&book).await {
            Ok(()) => {
                tracing::info!(book_id, "book deleted");
                Ok(())
            }
            // Removed by a concurrent request after the lookup above.
            Err(err @ StoreError::RowNotFound { .. }) => {
                tracing::warn!(book_id, error = %err, "book already deleted");
                Err(ResourceError::not_found(
                    RESOURCE,
                    "The book ID is not found in the database.",
                ))
            }
            Err(err) => {
                tracing::error!(book_id, error = %err, "error deleting book");
                Err(ResourceError::internal(
                    Operation::Delete,
                    RESOURCE,
                    format!("Error while deleting the book with the ID '{book_id}."),
                ))
            }
        }
    }
}
