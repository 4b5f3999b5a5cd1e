//! In-memory record store

use super::types::{compare_records, FindOptions, RecordStore};
use crate::error::Result;
use crate::pagination::Record;
use crate::types::RecordId;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Inner<R> {
    records: BTreeMap<RecordId, R>,
    last_id: RecordId,
}

/// Process-local store keyed by id
///
/// Ids are assigned in ascending order on insert, starting at 1.
#[derive(Debug)]
pub struct MemoryStore<R> {
    inner: Arc<RwLock<Inner<R>>>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> MemoryStore<R> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                records: BTreeMap::new(),
                last_id: 0,
            })),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

impl<R: Record + Clone> MemoryStore<R> {
    /// Filter and sort without applying skip/take
    async fn matching(&self, options: &FindOptions) -> Vec<R> {
        let inner = self.inner.read().await;
        let mut records: Vec<R> = inner
            .records
            .values()
            .filter(|r| options.filter.matches(r.id()))
            .cloned()
            .collect();
        records.sort_by(|a, b| compare_records(a, b, options.order));
        records
    }
}

fn window<R>(records: Vec<R>, options: &FindOptions) -> Vec<R> {
    let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
    let take = options
        .take
        .map_or(usize::MAX, |t| usize::try_from(t).unwrap_or(usize::MAX));
    records.into_iter().skip(skip).take(take).collect()
}

#[async_trait]
impl<R: Record + Clone> RecordStore<R> for MemoryStore<R> {
    async fn find(&self, options: &FindOptions) -> Result<Vec<R>> {
        let records = self.matching(options).await;
        Ok(window(records, options))
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<R>, u64)> {
        let records = self.matching(options).await;
        let total = records.len() as u64;
        Ok((window(records, options), total))
    }

    async fn find_one(&self, id: RecordId) -> Result<Option<R>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn save(&self, mut record: R) -> Result<R> {
        let mut inner = self.inner.write().await;
        if record.id() <= 0 {
            inner.last_id += 1;
            record.assign_id(inner.last_id);
        } else {
            inner.last_id = inner.last_id.max(record.id());
        }
        inner.records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<bool> {
        Ok(self.inner.write().await.records.remove(&id).is_some())
    }
}
