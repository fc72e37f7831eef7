//! In-memory row store backing the bookstore repositories.
//!
//! A [`MemoryTable`] assigns monotonically increasing ids on insert and keeps
//! an optional unique index. The uniqueness check and the write happen under
//! one lock, so two concurrent inserts with the same key yield exactly one
//! row and one [`StoreError::UniqueViolation`].

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tokio::sync::RwLock;

/// Primary key type for every table.
pub type RowId = i64;

/// A row type that can live in a [`MemoryTable`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Row contents before an id has been assigned.
    type Draft: Send;

    /// Materialize a draft with its freshly assigned id.
    fn from_draft(id: RowId, draft: Self::Draft) -> Self;

    fn id(&self) -> RowId;

    /// Value of the unique column, if the table has one.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// Failures reported by the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate value '{key}' violates unique constraint on table '{table}'")]
    UniqueViolation { table: &'static str, key: String },

    #[error("row {id} does not exist in table '{table}'")]
    RowNotFound { table: &'static str, id: RowId },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

struct TableState<R> {
    rows: BTreeMap<RowId, R>,
    unique: HashMap<String, RowId>,
    next_id: RowId,
}

/// A single table keyed by [`RowId`].
pub struct MemoryTable<R: Record> {
    name: &'static str,
    state: RwLock<TableState<R>>,
}

impl<R: Record> MemoryTable<R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                unique: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// All rows ordered by id.
    pub async fn all(&self) -> Vec<R> {
        self.state.read().await.rows.values().cloned().collect()
    }

    pub async fn get(&self, id: RowId) -> Option<R> {
        self.state.read().await.rows.get(&id).cloned()
    }

    /// Look a row up through the unique index.
    pub async fn find_unique(&self, key: &str) -> Option<R> {
        let state = self.state.read().await;
        state
            .unique
            .get(key)
            .and_then(|id| state.rows.get(id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insert a new row, assigning the next id.
    ///
    /// Ids are not consumed by rejected inserts.
    pub async fn insert(&self, draft: R::Draft) -> Result<R, StoreError> {
        let mut state = self.state.write().await;
        let record = R::from_draft(state.next_id, draft);

        if let Some(key) = record.unique_key() {
            if state.unique.contains_key(key) {
                return Err(StoreError::UniqueViolation {
                    table: self.name,
                    key: key.to_string(),
                });
            }
            state.unique.insert(key.to_string(), record.id());
        }

        state.next_id += 1;
        state.rows.insert(record.id(), record.clone());
        tracing::trace!(table = self.name, id = record.id(), "row inserted");
        Ok(record)
    }

    /// Overwrite an existing row.
    pub async fn update(&self, record: R) -> Result<R, StoreError> {
        let mut state = self.state.write().await;
        let id = record.id();

        let previous_key = match state.rows.get(&id) {
            Some(existing) => existing.unique_key().map(str::to_string),
            None => {
                return Err(StoreError::RowNotFound {
                    table: self.name,
                    id,
                })
            }
        };

        let next_key = record.unique_key().map(str::to_string);
        if next_key != previous_key {
            if let Some(key) = &next_key {
                if state.unique.get(key).is_some_and(|owner| *owner != id) {
                    return Err(StoreError::UniqueViolation {
                        table: self.name,
                        key: key.clone(),
                    });
                }
            }
            if let Some(key) = previous_key {
                state.unique.remove(&key);
            }
            if let Some(key) = next_key {
                state.unique.insert(key, id);
            }
        }

        state.rows.insert(id, record.clone());
        tracing::trace!(table = self.name, id, "row updated");
        Ok(record)
    }

    /// Remove a row, returning it.
    pub async fn remove(&self, id: RowId) -> Result<R, StoreError> {
        let mut state = self.state.write().await;
        let record = state.rows.remove(&id).ok_or(StoreError::RowNotFound {
            table: self.name,
            id,
        })?;

        if let Some(key) = record.unique_key() {
            state.unique.remove(key);
        }

        tracing::trace!(table = self.name, id, "row removed");
        Ok(record)
    }
}
