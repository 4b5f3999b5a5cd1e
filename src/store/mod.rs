//! Record store module
//!
//! The narrow persistence interface the pagination engine and the posts
//! service read and write through, plus an in-memory implementation.
//! The DuckDB-backed store lives in `crate::database`.

mod memory;
mod types;

pub use memory::MemoryStore;
pub use types::{compare_records, FindOptions, IdFilter, RecordStore};

#[cfg(test)]
mod tests;
