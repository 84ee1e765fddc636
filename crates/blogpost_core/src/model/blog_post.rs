//! BlogPost domain model.
//!
//! # Responsibility
//! - Define the record stored by every persistence service variant.
//! - Provide the required-field check used by the optional strict path.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `id == UNSAVED_ID` means the post has not been persisted yet.
//! - Ids are unique within one store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier assigned by the persistence layer.
pub type BlogPostId = i64;

/// Id carried by posts that have not been stored yet.
pub const UNSAVED_ID: BlogPostId = 0;

/// Persisted blog post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Store-assigned id. Omitted in create payloads.
    #[serde(default)]
    pub id: BlogPostId,
    pub title: String,
    pub author: String,
    pub content: String,
}

/// Required field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogPostValidationError {
    MissingTitle,
    MissingAuthor,
    MissingContent,
}

impl BlogPostValidationError {
    /// Field name as it appears in JSON payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingAuthor => "author",
            Self::MissingContent => "content",
        }
    }
}

impl Display for BlogPostValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "blog post field `{}` is required", self.field())
    }
}

impl Error for BlogPostValidationError {}

impl BlogPost {
    /// Creates an unsaved post. The store assigns the id on insert.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::with_id(UNSAVED_ID, title, author, content)
    }

    /// Creates a post with a caller-provided id.
    ///
    /// Used for seed data and for update payloads that target an existing row.
    pub fn with_id(
        id: BlogPostId,
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            content: content.into(),
        }
    }

    /// Returns whether a store has assigned an id to this post.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }

    /// Checks that title, author and content are all present.
    ///
    /// Whitespace-only values count as missing. Fields are checked in
    /// declaration order and the first failure is reported.
    pub fn validate(&self) -> Result<(), BlogPostValidationError> {
        if self.title.trim().is_empty() {
            return Err(BlogPostValidationError::MissingTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BlogPostValidationError::MissingAuthor);
        }
        if self.content.trim().is_empty() {
            return Err(BlogPostValidationError::MissingContent);
        }
        Ok(())
    }

    /// Overwrites every mutable field with the values from `other`.
    ///
    /// `self.id` is kept as-is.
    pub fn apply_changes(&mut self, other: &BlogPost) {
        self.title.clone_from(&other.title);
        self.author.clone_from(&other.author);
        self.content.clone_from(&other.content);
    }
}

/// Canonical three-post data set used to seed the in-memory store.
pub fn seed_posts() -> Vec<BlogPost> {
    [
        (1, "First BlogPost", "Oscar Recio"),
        (2, "Second BlogPost", "Edith Mendoza"),
        (3, "Third BlogPost", "Diego"),
    ]
    .into_iter()
    .map(|(id, title, author)| {
        BlogPost::with_id(id, title, author, format!("{title} by {author}"))
    })
    .collect()
}
