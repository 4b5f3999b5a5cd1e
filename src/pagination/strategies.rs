//! Pagination strategy implementations
//!
//! Cursor mode is the listing default; page mode serves callers that pass
//! an explicit page number.

use super::link::NextLinkBuilder;
use super::types::{
    CursorInfo, CursorPage, NumberedPage, Page, PageMode, PaginationRequest, Record,
};
use crate::error::Result;
use crate::store::{FindOptions, RecordStore};
use async_trait::async_trait;

/// Core trait for pagination strategies
#[async_trait]
pub trait Paginator<R: Record>: Send + Sync {
    /// Fetch the page described by `request`
    async fn paginate(
        &self,
        request: &PaginationRequest,
        store: &dyn RecordStore<R>,
    ) -> Result<Page<R>>;
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Keyset pagination on the primary key
///
/// A next page is presumed only when the store returned exactly `take`
/// records; a short page is the last one.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    links: NextLinkBuilder,
}

impl CursorPaginator {
    /// Create a cursor paginator emitting links through `links`
    pub fn new(links: NextLinkBuilder) -> Self {
        Self { links }
    }

    /// Fetch a cursor page
    pub async fn fetch<R: Record>(
        &self,
        request: &PaginationRequest,
        store: &dyn RecordStore<R>,
    ) -> Result<CursorPage<R>> {
        let options = FindOptions::new()
            .with_filter(request.id_filter())
            .ordered(request.order)
            .take(request.take);

        let data = store.find(&options).await?;

        let after = match data.last() {
            Some(last) if data.len() as u64 == request.take => Some(last.id()),
            _ => None,
        };
        let next = after.map(|id| self.links.next_url(request, id));

        tracing::debug!(
            filter = ?options.filter,
            returned = data.len(),
            take = request.take,
            ?after,
            "cursor page fetched"
        );

        Ok(CursorPage {
            count: data.len(),
            data,
            cursor: CursorInfo { after },
            next,
        })
    }
}

#[async_trait]
impl<R: Record> Paginator<R> for CursorPaginator {
    async fn paginate(
        &self,
        request: &PaginationRequest,
        store: &dyn RecordStore<R>,
    ) -> Result<Page<R>> {
        self.fetch(request, store).await.map(Page::Cursor)
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Offset pagination with 1-based page numbers
///
/// `skip = take * (page - 1)`. Pages past the end come back empty with the
/// same total.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageNumberPaginator;

impl PageNumberPaginator {
    /// Fetch a numbered page
    pub async fn fetch<R: Record>(
        &self,
        request: &PaginationRequest,
        store: &dyn RecordStore<R>,
    ) -> Result<NumberedPage<R>> {
        let options = FindOptions::new()
            .ordered(request.order)
            .skip(request.skip())
            .take(request.take);

        let (data, total) = store.find_and_count(&options).await?;

        tracing::debug!(
            page = ?request.page,
            skip = options.skip,
            returned = data.len(),
            total,
            "numbered page fetched"
        );

        Ok(NumberedPage { data, total })
    }
}

#[async_trait]
impl<R: Record> Paginator<R> for PageNumberPaginator {
    async fn paginate(
        &self,
        request: &PaginationRequest,
        store: &dyn RecordStore<R>,
    ) -> Result<Page<R>> {
        self.fetch(request, store).await.map(Page::Numbered)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Serve a request with the strategy its mode selects
pub async fn paginate<R: Record>(
    request: &PaginationRequest,
    store: &dyn RecordStore<R>,
    links: NextLinkBuilder,
) -> Result<Page<R>> {
    match request.mode() {
        PageMode::Page(_) => PageNumberPaginator.paginate(request, store).await,
        PageMode::Cursor => CursorPaginator::new(links).paginate(request, store).await,
    }
}
