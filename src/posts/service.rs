//! Posts service
//!
//! Listing, lookup and writes for blog posts. Listing goes through the
//! pagination engine; protocol and host for next links are read from the
//! config provider on every call.

use super::types::{CreatePost, Post, UpdatePost};
use crate::config::ConfigProvider;
use crate::error::{Error, Result};
use crate::pagination::{paginate, NextLinkBuilder, Page, QueryNormalizer};
use crate::store::RecordStore;
use crate::types::RecordId;
use crate::upload::FileStager;
use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Collection segment used in next links
pub const POSTS_COLLECTION: &str = "posts";

/// Number of posts created by `generate_posts` when no count is given
pub const DEFAULT_GENERATED_POSTS: usize = 100;

/// Upper bound on posts created by one `generate_posts` call
pub const MAX_GENERATED_POSTS: usize = 1000;

static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Posts service over a record store
#[derive(Clone)]
pub struct PostsService {
    store: Arc<dyn RecordStore<Post>>,
    config: Arc<dyn ConfigProvider>,
    stager: Arc<dyn FileStager>,
    normalizer: QueryNormalizer,
}

impl std::fmt::Debug for PostsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostsService")
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

impl PostsService {
    /// Create a service
    pub fn new(
        store: Arc<dyn RecordStore<Post>>,
        config: Arc<dyn ConfigProvider>,
        stager: Arc<dyn FileStager>,
    ) -> Self {
        Self {
            store,
            config,
            stager,
            normalizer: QueryNormalizer::default(),
        }
    }

    /// Use a different default page size
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: QueryNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// List posts from raw query pairs
    ///
    /// A `page` parameter selects offset pagination; everything else is
    /// served by cursor pagination.
    pub async fn paginate_posts<I, K, V>(&self, query: I) -> Result<Page<Post>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let request = self.normalizer.normalize(query);
        let links = NextLinkBuilder::from_config(self.config.as_ref(), POSTS_COLLECTION)?;
        paginate(&request, self.store.as_ref(), links).await
    }

    /// Fetch a single post
    pub async fn get_post(&self, id: RecordId) -> Result<Post> {
        self.store
            .find_one(id)
            .await?
            .ok_or_else(|| Error::not_found("post", id))
    }

    /// Create a post for `author_id`
    ///
    /// A referenced image must already be staged; it is moved into the
    /// posts area before the post is stored.
    pub async fn create_post(&self, author_id: RecordId, payload: CreatePost) -> Result<Post> {
        let mut post = Post::new(author_id, payload.title, payload.content);

        if let Some(image) = payload.image.filter(|i| !i.is_empty()) {
            let stored = self.stager.promote(&image).await?;
            let name = stored.rsplit('/').next().unwrap_or(stored.as_str());
            post = post.with_image(name);
        }

        let post = self.store.save(post).await?;
        tracing::info!(id = post.id, author_id, "created post");
        Ok(post)
    }

    /// Apply a partial update; empty fields are left unchanged
    pub async fn update_post(&self, id: RecordId, payload: UpdatePost) -> Result<Post> {
        let mut post = self.get_post(id).await?;
        if !post.apply(payload) {
            return Ok(post);
        }
        let post = self.store.save(post).await?;
        tracing::info!(id, "updated post");
        Ok(post)
    }

    /// Delete a post, returning its id
    pub async fn delete_post(&self, id: RecordId) -> Result<RecordId> {
        if !self.store.delete(id).await? {
            return Err(Error::not_found("post", id));
        }
        tracing::info!(id, "deleted post");
        Ok(id)
    }

    /// Stage an uploaded image under a generated name
    ///
    /// The returned name is what a later `CreatePost.image` refers to. The
    /// extension of `original_name` is kept.
    pub async fn stage_image(&self, original_name: &str, data: Bytes) -> Result<String> {
        let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = format!("{}-{seq}", Utc::now().timestamp_micros());
        if let Some(ext) = Path::new(original_name).extension().and_then(|e| e.to_str()) {
            name = format!("{name}.{ext}");
        }

        let staged = self.stager.stage(&name, data).await?;
        tracing::info!(original_name, %staged, "staged image");
        Ok(staged)
    }

    /// Create `count` placeholder posts for `author_id`
    pub async fn generate_posts(&self, author_id: RecordId, count: usize) -> Result<Vec<Post>> {
        if count > MAX_GENERATED_POSTS {
            return Err(Error::bad_request(format!(
                "Cannot generate more than {MAX_GENERATED_POSTS} posts, got {count}"
            )));
        }

        let mut created = Vec::new();
        for i in 0..count {
            let title = format!("generated post {i}");
            let post = self
                .store
                .save(Post::new(author_id, title.clone(), title))
                .await?;
            created.push(post);
        }
        tracing::info!(author_id, count, "generated posts");
        Ok(created)
    }
}
