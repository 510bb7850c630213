use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guide_core::model::{ProgressState, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The backing store could not be reached or its lock was poisoned.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Persisted progress of one reader on one content page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub unit_key: String,
    pub state: ProgressState,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Creates a record for `user_id` on the page keyed `unit_key`.
    #[must_use]
    pub fn new(
        user_id: UserId,
        unit_key: impl Into<String>,
        state: ProgressState,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            unit_key: unit_key.into(),
            state,
            updated_at,
        }
    }
}

/// Repository contract for per-page reader progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored progress for a page, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn get_progress(
        &self,
        user_id: UserId,
        unit_key: &str,
    ) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist or replace a progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// All progress records of a reader, ordered by page key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError>;
}

/// In-memory progress store for tests and hosts without a user-data backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<(UserId, String), ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        unit_key: &str,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(user_id, unit_key.to_owned())).cloned())
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((record.user_id, record.unit_key.clone()), record.clone());
        Ok(())
    }

    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut records: Vec<ProgressRecord> = guard
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.unit_key.cmp(&b.unit_key));
        Ok(records)
    }
}

/// Repository handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
