//! Posts module
//!
//! The post record, its request payloads and the service the HTTP layer and
//! CLI call into.

mod service;
mod types;

pub use service::{PostsService, DEFAULT_GENERATED_POSTS, MAX_GENERATED_POSTS, POSTS_COLLECTION};
pub use types::{CreatePost, Post, UpdatePost};
