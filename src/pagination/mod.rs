//! Pagination module
//!
//! Supports: Cursor (keyset on the primary key), Page Number
//!
//! # Overview
//!
//! Raw query pairs are normalized into a `PaginationRequest`. A request with
//! a `page` is served by offset pagination; every other request is served
//! by keyset pagination, which also synthesizes the absolute URL of the next
//! page.
//!
//! ```text
//! query pairs ─► QueryNormalizer ─► PaginationRequest
//!                                        │
//!                 ┌──────────────────────┴─────────────────┐
//!          PageNumberPaginator                     CursorPaginator
//!          (skip/take + count)                  (id < / id > + take)
//!                 │                                        │
//!            NumberedPage                    CursorPage + NextLinkBuilder
//! ```

mod link;
mod query;
mod strategies;
mod types;

pub use link::NextLinkBuilder;
pub use query::QueryNormalizer;
pub use strategies::{paginate, CursorPaginator, PageNumberPaginator, Paginator};
pub use types::{
    CursorInfo, CursorPage, NumberedPage, Page, PageMode, PaginationRequest, Record,
    SortDirection, LESS_THAN_KEY, MORE_THAN_KEY, ORDER_KEY, PAGE_KEY, TAKE_KEY,
};
