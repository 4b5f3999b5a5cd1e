//! Post record and request payloads

use crate::pagination::Record;
use crate::types::{OptionStringExt, RecordId};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Primary key; 0 until stored
    pub id: RecordId,
    /// Id of the authoring user
    pub author_id: RecordId,
    pub title: String,
    pub content: String,
    /// File name under the posts image directory
    #[serde(default)]
    pub image: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create an unsaved post stamped with the current time
    pub fn new(author_id: RecordId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new_at(author_id, title, content, now())
    }

    /// Create an unsaved post with an explicit creation time
    pub fn new_at(
        author_id: RecordId,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let created_at = created_at.trunc_subsecs(6);
        Self {
            id: 0,
            author_id,
            title: title.into(),
            content: content.into(),
            image: None,
            like_count: 0,
            comment_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Attach an image file name
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Apply a partial update; empty fields are ignored
    ///
    /// Returns true when anything changed.
    pub fn apply(&mut self, update: UpdatePost) -> bool {
        let mut changed = false;
        if let Some(title) = update.title.none_if_empty() {
            self.title = title;
            changed = true;
        }
        if let Some(content) = update.content.none_if_empty() {
            self.content = content;
            changed = true;
        }
        if changed {
            self.updated_at = now();
        }
        changed
    }
}

impl Record for Post {
    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Body of `POST /posts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    /// Name of a file previously staged in the temp area
    #[serde(default)]
    pub image: Option<String>,
}

/// Body of `PATCH /posts/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Current time at the precision stores keep (microseconds)
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
