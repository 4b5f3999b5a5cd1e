//! Pagination types
//!
//! Defines the typed request produced from raw query parameters and the
//! page results returned by both strategies.

use crate::config::DEFAULT_TAKE;
use crate::store::IdFilter;
use crate::types::{QueryPairs, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Query Keys
// ============================================================================

/// Page size parameter
pub const TAKE_KEY: &str = "take";

/// Sort direction on the creation timestamp
pub const ORDER_KEY: &str = "order__createdAt";

/// 1-based page number, selects page mode
pub const PAGE_KEY: &str = "page";

/// Exclusive upper bound on the primary key
pub const LESS_THAN_KEY: &str = "where__id__less_than";

/// Exclusive lower bound on the primary key
pub const MORE_THAN_KEY: &str = "where__id__more_than";

// ============================================================================
// Record
// ============================================================================

/// A paginated record
///
/// The engine only looks at the primary key and the creation timestamp.
/// Cursor pagination filters on the key but orders by the timestamp, so both
/// must increase together for cursors to be exact.
pub trait Record: Send + Sync + 'static {
    /// Primary key; 0 means "not yet stored"
    fn id(&self) -> RecordId;

    /// Creation timestamp used for ordering
    fn created_at(&self) -> DateTime<Utc>;

    /// Set the primary key (called by stores on insert)
    fn assign_id(&mut self, id: RecordId);
}

// ============================================================================
// Sort Direction
// ============================================================================

/// Sort direction on the creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

impl SortDirection {
    /// Parse "ASC"/"DESC" (any case)
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    /// Query/SQL spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Cursor parameter that continues a traversal in this direction
    ///
    /// Ascending pages advance past larger ids, descending pages past
    /// smaller ones.
    pub fn next_cursor_key(&self) -> &'static str {
        match self {
            Self::Asc => MORE_THAN_KEY,
            Self::Desc => LESS_THAN_KEY,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Pagination Request
// ============================================================================

/// Which strategy serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Keyset pagination on the primary key
    Cursor,
    /// Offset pagination with the given 1-based page
    Page(u64),
}

/// Typed pagination request
///
/// Built once per call by the query normalizer. `params` keeps the raw
/// pairs in input order so the next link can echo them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationRequest {
    /// Page size, always at least 1
    pub take: u64,
    /// Sort direction on the creation timestamp
    pub order: SortDirection,
    /// 1-based page number; selects page mode when present
    pub page: Option<u64>,
    /// Exclusive upper id bound
    pub less_than: Option<RecordId>,
    /// Exclusive lower id bound
    pub more_than: Option<RecordId>,
    /// Raw query pairs, in input order
    pub params: QueryPairs,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            take: DEFAULT_TAKE,
            order: SortDirection::Asc,
            page: None,
            less_than: None,
            more_than: None,
            params: Vec::new(),
        }
    }
}

impl PaginationRequest {
    /// Create a request for the first page with the given size
    pub fn new(take: u64) -> Self {
        Self {
            take: take.max(1),
            ..Default::default()
        }
    }

    /// Set the sort direction
    #[must_use]
    pub fn with_order(mut self, order: SortDirection) -> Self {
        self.order = order;
        self
    }

    /// Switch to page mode
    #[must_use]
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Set the exclusive upper id bound
    #[must_use]
    pub fn with_less_than(mut self, id: RecordId) -> Self {
        self.less_than = Some(id);
        self
    }

    /// Set the exclusive lower id bound
    #[must_use]
    pub fn with_more_than(mut self, id: RecordId) -> Self {
        self.more_than = Some(id);
        self
    }

    /// Carry an extra raw parameter for echoing
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Strategy selected by this request
    pub fn mode(&self) -> PageMode {
        match self.page {
            Some(page) => PageMode::Page(page),
            None => PageMode::Cursor,
        }
    }

    /// Keyset filter; `less_than` wins when both bounds are set
    pub fn id_filter(&self) -> IdFilter {
        if let Some(id) = self.less_than {
            IdFilter::LessThan(id)
        } else if let Some(id) = self.more_than {
            IdFilter::MoreThan(id)
        } else {
            IdFilter::Any
        }
    }

    /// Offset for page mode: `take * (page - 1)`
    pub fn skip(&self) -> u64 {
        let page = self.page.unwrap_or(1).max(1);
        self.take.saturating_mul(page - 1)
    }

    /// Parameters to carry into the next link, cursor keys excluded
    ///
    /// Raw keys keep their input order. Recognized keys are echoed once with
    /// their normalized value; `take` and `order__createdAt` are appended
    /// when the caller left them out.
    pub fn echo_params(&self) -> QueryPairs {
        let mut out = Vec::with_capacity(self.params.len() + 2);
        let mut take_seen = false;
        let mut order_seen = false;
        let mut page_seen = false;

        for (key, value) in &self.params {
            match key.as_str() {
                LESS_THAN_KEY | MORE_THAN_KEY | "" => {}
                TAKE_KEY => {
                    if !take_seen {
                        take_seen = true;
                        out.push((TAKE_KEY.to_string(), self.take.to_string()));
                    }
                }
                ORDER_KEY => {
                    if !order_seen {
                        order_seen = true;
                        out.push((ORDER_KEY.to_string(), self.order.to_string()));
                    }
                }
                PAGE_KEY => {
                    if !page_seen {
                        page_seen = true;
                        if let Some(page) = self.page {
                            out.push((PAGE_KEY.to_string(), page.to_string()));
                        }
                    }
                }
                _ => {
                    if !value.is_empty() {
                        out.push((key.clone(), value.clone()));
                    }
                }
            }
        }

        if !take_seen {
            out.push((TAKE_KEY.to_string(), self.take.to_string()));
        }
        if !order_seen {
            out.push((ORDER_KEY.to_string(), self.order.to_string()));
        }
        if let (false, Some(page)) = (page_seen, self.page) {
            out.push((PAGE_KEY.to_string(), page.to_string()));
        }

        out
    }
}

// ============================================================================
// Page Results
// ============================================================================

/// Cursor position of a returned page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorInfo {
    /// Id of the last record when a next page is presumed
    pub after: Option<RecordId>,
}

/// Result of cursor-mode pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<R> {
    /// Records, at most `take`
    pub data: Vec<R>,
    /// Where the next page starts
    pub cursor: CursorInfo,
    /// Number of records in `data`
    pub count: usize,
    /// Absolute URL of the next page
    pub next: Option<String>,
}

impl<R> CursorPage<R> {
    /// Check whether a following page was advertised
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Result of page-mode pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedPage<R> {
    /// Records on the requested page
    pub data: Vec<R>,
    /// Total number of matching records
    pub total: u64,
}

/// Result of either strategy, serialized without a tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<R> {
    /// Cursor-mode result
    Cursor(CursorPage<R>),
    /// Page-mode result
    Numbered(NumberedPage<R>),
}

impl<R> Page<R> {
    /// Records on this page
    pub fn data(&self) -> &[R] {
        match self {
            Self::Cursor(page) => &page.data,
            Self::Numbered(page) => &page.data,
        }
    }

    /// Consume the page, keeping its records
    pub fn into_data(self) -> Vec<R> {
        match self {
            Self::Cursor(page) => page.data,
            Self::Numbered(page) => page.data,
        }
    }

    /// Next link, cursor mode only
    pub fn next_url(&self) -> Option<&str> {
        match self {
            Self::Cursor(page) => page.next.as_deref(),
            Self::Numbered(_) => None,
        }
    }

    /// Borrow the cursor-mode result
    pub fn as_cursor(&self) -> Option<&CursorPage<R>> {
        match self {
            Self::Cursor(page) => Some(page),
            Self::Numbered(_) => None,
        }
    }

    /// Borrow the page-mode result
    pub fn as_numbered(&self) -> Option<&NumberedPage<R>> {
        match self {
            Self::Cursor(_) => None,
            Self::Numbered(page) => Some(page),
        }
    }
}
