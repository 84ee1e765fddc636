//! Persistence service contract for blog posts.
//!
//! # Responsibility
//! - Define the storage capability consumed by the controller.
//! - Define the error shape shared by every storage variant.
//!
//! # Invariants
//! - Lookups signal absence with `Ok(None)`, never with an error.
//! - `insert` ignores the incoming id and returns the stored post with the
//!   newly assigned one.
//! - `update` and `delete` on a missing id return `ServiceError::NotFound`.

use crate::db::DbError;
use crate::model::blog_post::{BlogPost, BlogPostId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by persistence service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Target post does not exist.
    NotFound(BlogPostId),
    /// Storage engine failure.
    Db(DbError),
    /// A preloaded post carries an id a store may not hold.
    InvalidId(BlogPostId),
    /// Two preloaded posts share one id.
    DuplicateId(BlogPostId),
    /// The id space is used up; no further post can be stored.
    IdsExhausted,
    /// A stored row could not be mapped back to a post.
    InvalidData(String),
    /// A previous holder of the store lock panicked.
    Poisoned,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "blog post not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidId(id) => write!(f, "invalid blog post id: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate blog post id: {id}"),
            Self::IdsExhausted => write!(f, "blog post ids exhausted"),
            Self::InvalidData(message) => write!(f, "invalid persisted blog post: {message}"),
            Self::Poisoned => write!(f, "blog post store lock poisoned"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidId(_)
            | Self::DuplicateId(_)
            | Self::IdsExhausted
            | Self::InvalidData(_)
            | Self::Poisoned => None,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage capability for blog posts.
///
/// Implementations are selected by construction and injected into the
/// controller; nothing looks them up at runtime.
pub trait BlogPostService: Send + Sync {
    /// Returns every stored post. An empty store yields an empty vector.
    fn get_all(&self) -> ServiceResult<Vec<BlogPost>>;

    /// Returns the post with `id`, or `None` when it is not stored.
    fn get_by_id(&self, id: BlogPostId) -> ServiceResult<Option<BlogPost>>;

    /// Stores `post` under a new unique id and returns the stored copy.
    fn insert(&self, post: BlogPost) -> ServiceResult<BlogPost>;

    /// Overwrites title, author and content of the post with `post.id`.
    fn update(&self, post: &BlogPost) -> ServiceResult<()>;

    /// Removes the post with `id`.
    fn delete(&self, id: BlogPostId) -> ServiceResult<()>;

    /// Removes the stored post matching `post.id`.
    fn delete_post(&self, post: &BlogPost) -> ServiceResult<()> {
        self.delete(post.id)
    }
}
