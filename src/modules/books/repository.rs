use async_trait::async_trait;
use bookstore_db::{MemoryTable, RowId, StoreError};

use super::models::{Book, NewBook};

/// Persistence contract the book service depends on.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_all(&self) -> Vec<Book>;

    async fn find_by_id(&self, id: RowId) -> Option<Book>;

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;

    async fn save(&self, book: Book) -> Result<Book, StoreError>;

    async fn delete(&self, book: &Book) -> Result<(), StoreError>;
}

/// [`BookRepository`] backed by an in-process [`MemoryTable`].
pub struct MemoryBookRepository {
    table: MemoryTable<Book>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("book"),
        }
    }
}

impl Default for MemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_all(&self) -> Vec<Book> {
        self.table.all().await
    }

    async fn find_by_id(&self, id: RowId) -> Option<Book> {
        self.table.get(id).await
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        self.table.insert(book).await
    }

    async fn save(&self, book: Book) -> Result<Book, StoreError> {
        self.table.update(book).await
    }

    async fn delete(&self, book: &Book) -> Result<(), StoreError> {
        self.table.remove(book.id).await.map(|_| ())
    }
}
