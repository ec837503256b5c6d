//! Record store abstraction shared by the LeadX list views.
//!
//! Records are never mutated in place: `update` hands the current record to a
//! patch closure and stores the record it returns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub trait Record: Clone + Send + Sync + 'static {
    /// Short noun used in log lines and errors, e.g. `"automation"`.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Produces the next version of a record from the current one.
pub type Patch<R> = Box<dyn FnOnce(&R) -> R + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    Front,
    #[default]
    Back,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("patch for {kind} '{id}' changed its id to '{new_id}'")]
    IdChanged {
        kind: &'static str,
        id: String,
        new_id: String,
    },
}

/// Record filter passed to [`Repository::list`].
pub type Predicate<'a, R> = dyn for<'r> Fn(&'r R) -> bool + Send + Sync + 'a;

#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    async fn get(&self, id: &str) -> Result<R, RepositoryError>;

    /// Records accepted by `predicate`, in store order.
    async fn list(
        &self,
        predicate: &Predicate<'_, R>,
    ) -> Result<Vec<R>, RepositoryError>;

    async fn update(&self, id: &str, patch: Patch<R>) -> Result<R, RepositoryError>;

    async fn insert(&self, record: R, position: InsertPosition) -> Result<(), RepositoryError>;

    async fn all(&self) -> Result<Vec<R>, RepositoryError> {
        self.list(&|_: &R| true).await
    }
}

#[derive(Debug)]
pub struct InMemoryRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Seeds the store. Later duplicates of an id are dropped.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let mut unique: Vec<R> = Vec::new();
        for record in records {
            if unique.iter().any(|existing| existing.id() == record.id()) {
                debug!(kind = R::KIND, id = record.id(), "dropping duplicate seed record");
                continue;
            }
            unique.push(record);
        }
        Self {
            records: RwLock::new(unique),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn get(&self, id: &str) -> Result<R, RepositoryError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            })
    }

    async fn list(
        &self,
        predicate: &Predicate<'_, R>,
    ) -> Result<Vec<R>, RepositoryError> {
        let records = self.records.read().await;
        let matched: Vec<R> = records
            .iter()
            .filter(|record| predicate(*record))
            .cloned()
            .collect();
        debug!(
            kind = R::KIND,
            total = records.len(),
            matched = matched.len(),
            "listed records"
        );
        Ok(matched)
    }

    async fn update(&self, id: &str, patch: Patch<R>) -> Result<R, RepositoryError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| RepositoryError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            })?;

        let next = patch(slot);
        if next.id() != id {
            return Err(RepositoryError::IdChanged {
                kind: R::KIND,
                id: id.to_string(),
                new_id: next.id().to_string(),
            });
        }

        *slot = next.clone();
        info!(kind = R::KIND, id, "record updated");
        Ok(next)
    }

    async fn insert(&self, record: R, position: InsertPosition) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(RepositoryError::Duplicate {
                kind: R::KIND,
                id: record.id().to_string(),
            });
        }

        info!(kind = R::KIND, id = record.id(), ?position, "record inserted");
        match position {
            InsertPosition::Front => records.insert(0, record),
            InsertPosition::Back => records.push(record),
        }
        Ok(())
    }
}
