//! Posts persistence via DuckDB
//!
//! `DatabaseStore` implements `RecordStore<Post>` on top of a DuckDB
//! connection, either in-memory or backed by a database file.

mod engine;

pub use engine::DatabaseStore;
