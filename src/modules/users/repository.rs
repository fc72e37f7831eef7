use async_trait::async_trait;
use bookstore_db::{MemoryTable, RowId, StoreError};

use super::models::{NewUser, User};

/// Persistence contract the user service depends on.
///
/// `insert` reports a duplicate username as [`StoreError::UniqueViolation`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Vec<User>;

    async fn find_by_id(&self, id: RowId) -> Option<User>;

    async fn find_by_username(&self, username: &str) -> Option<User>;

    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn save(&self, user: User) -> Result<User, StoreError>;

    async fn delete(&self, user: &User) -> Result<(), StoreError>;
}

/// [`UserRepository`] backed by an in-process [`MemoryTable`] indexed on username.
pub struct MemoryUserRepository {
    table: MemoryTable<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("user_app"),
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_all(&self) -> Vec<User> {
        self.table.all().await
    }

    async fn find_by_id(&self, id: RowId) -> Option<User> {
        self.table.get(id).await
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        self.table.find_unique(username).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.table.insert(user).await
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        self.table.update(user).await
    }

    async fn delete(&self, user: &User) -> Result<(), StoreError> {
        self.table.remove(user.id).await.map(|_| ())
    }
}
