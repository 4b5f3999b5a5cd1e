//! Record store types and traits

use crate::error::Result;
use crate::pagination::{Record, SortDirection};
use crate::types::RecordId;
use async_trait::async_trait;
use std::cmp::Ordering;

/// Exclusive bound on the primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdFilter {
    /// No restriction
    #[default]
    Any,
    /// `id < bound`
    LessThan(RecordId),
    /// `id > bound`
    MoreThan(RecordId),
}

impl IdFilter {
    /// Check whether an id passes the filter
    pub fn matches(&self, id: RecordId) -> bool {
        match *self {
            Self::Any => true,
            Self::LessThan(bound) => id < bound,
            Self::MoreThan(bound) => id > bound,
        }
    }
}

/// Query options for `find` and `find_and_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindOptions {
    /// Keyset filter
    pub filter: IdFilter,
    /// Order on the creation timestamp (ties broken by id)
    pub order: SortDirection,
    /// Rows to skip
    pub skip: u64,
    /// Maximum rows to return; unlimited when absent
    pub take: Option<u64>,
}

impl FindOptions {
    /// Unfiltered, ascending, unlimited
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyset filter
    #[must_use]
    pub fn with_filter(mut self, filter: IdFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the sort direction
    #[must_use]
    pub fn ordered(mut self, order: SortDirection) -> Self {
        self.order = order;
        self
    }

    /// Set the offset
    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the row limit
    #[must_use]
    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }
}

/// Persistence for paginated records
///
/// `find` must order by creation timestamp, then id, both in the requested
/// direction, so pages are stable for equal timestamps.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Records matching the options
    async fn find(&self, options: &FindOptions) -> Result<Vec<R>>;

    /// Records matching the options plus the number matching the filter
    /// (ignoring skip/take)
    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<R>, u64)>;

    /// Record with the given id
    async fn find_one(&self, id: RecordId) -> Result<Option<R>>;

    /// Insert (id 0) or replace a record, returning the stored record
    async fn save(&self, record: R) -> Result<R>;

    /// Delete a record; false when it did not exist
    async fn delete(&self, id: RecordId) -> Result<bool>;
}

/// Compare two records in listing order
pub fn compare_records<R: Record>(a: &R, b: &R, order: SortDirection) -> Ordering {
    let ascending = a
        .created_at()
        .cmp(&b.created_at())
        .then_with(|| a.id().cmp(&b.id()));
    match order {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}
