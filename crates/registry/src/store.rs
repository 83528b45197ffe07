use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::FeedRecord;

/// Result of an insert-if-absent write.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The record was written; this caller created it.
    Created(FeedRecord),
    /// A record already existed under that id; it is returned unchanged.
    Existing(FeedRecord),
}

/// Key/value persistence for feed records.
///
/// `insert_if_absent` is the serialization point for concurrent
/// registration: implementations must guarantee that when two writers race
/// on the same id, exactly one record survives and both writers can see it.
#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn get(&self, id: &str) -> crate::Result<Option<FeedRecord>>;

    async fn insert_if_absent(&self, record: FeedRecord) -> crate::Result<InsertOutcome>;

    async fn all(&self) -> crate::Result<Vec<FeedRecord>>;
}

/// In-memory store backed by a locked map. Used in tests and useful for
/// running the service without a database file.
#[derive(Default)]
pub struct MemoryFeedStore {
    records: RwLock<HashMap<String, FeedRecord>>,
}

impl MemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn get(&self, id: &str) -> crate::Result<Option<FeedRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn insert_if_absent(&self, record: FeedRecord) -> crate::Result<InsertOutcome> {
        let mut records = self.records.write().await;
        match records.get(&record.id) {
            Some(existing) => Ok(InsertOutcome::Existing(existing.clone())),
            None => {
                records.insert(record.id.clone(), record.clone());
                Ok(InsertOutcome::Created(record))
            }
        }
    }

    async fn all(&self) -> crate::Result<Vec<FeedRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
