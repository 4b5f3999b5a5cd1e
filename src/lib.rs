// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_self)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Postboard
//!
//! Backend for a blog's posts collection, built around a dual-mode
//! pagination engine.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Keyset pages on the post id with a ready-made `next` URL
//! - **Page Pagination**: Classic `page`/`take` windows with a total count
//! - **Pluggable Stores**: In-memory or DuckDB-backed posts table
//! - **JWT Auth**: Bearer access tokens guard post creation
//! - **Uploads**: Staged images moved into permanent storage via `object_store`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use postboard::config::Settings;
//! use postboard::cli::AppState;
//!
//! #[tokio::main]
//! async fn main() -> postboard::Result<()> {
//!     let settings = Settings::load(None)?;
//!     let state = AppState::from_settings(&settings)?;
//!
//!     state.posts.generate_posts(1, 10).await?;
//!     let page = state.posts.paginate_posts([("take", "3")]).await?;
//!     println!("{}", page.next_url().unwrap_or("<last page>"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                HTTP (axum) / CLI (clap)                  │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────┬───────────┴────────────┬──────────────────┐
//! │     Auth     │     PostsService       │     Uploads      │
//! │  JWT HS256   │                        │   object_store   │
//! └──────────────┴───────────┬────────────┴──────────────────┘
//!                            │
//! ┌──────────────────────────┴───────────────────────────────┐
//! │  Pagination: QueryNormalizer ─► Cursor / Page strategy   │
//! │              NextLinkBuilder (protocol + host config)    │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┴───────────────────────────────┐
//! │      RecordStore: MemoryStore | DatabaseStore (DuckDB)   │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Settings and the config provider seam
pub mod config;

/// Cursor and page pagination
pub mod pagination;

/// Record store interface and in-memory store
pub mod store;

/// DuckDB-backed posts store
pub mod database;

/// Post records and the posts service
pub mod posts;

/// Identity resolution for write endpoints
pub mod auth;

/// Upload staging
pub mod upload;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use pagination::{Page, PaginationRequest, QueryNormalizer};
pub use posts::{Post, PostsService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
