//! Collection-backed blog post service.
//!
//! # Responsibility
//! - Keep posts in an insertion-ordered vector owned by one service value.
//! - Assign ids with a next-sequential-integer policy.
//!
//! # Invariants
//! - `next_id` is always greater than every id ever stored, so ids are never
//!   reused, even after deletes.
//! - State lives in the instance; two services never share posts.

use crate::model::blog_post::{seed_posts, BlogPost, BlogPostId, UNSAVED_ID};
use crate::service::blog_post_service::{BlogPostService, ServiceError, ServiceResult};
use log::debug;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

const FIRST_ID: BlogPostId = 1;

struct Store {
    posts: Vec<BlogPost>,
    next_id: BlogPostId,
}

impl Store {
    fn position(&self, id: BlogPostId) -> Option<usize> {
        self.posts.iter().position(|post| post.id == id)
    }
}

/// In-process blog post store.
pub struct InMemoryBlogPostService {
    store: Mutex<Store>,
}

impl Default for InMemoryBlogPostService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBlogPostService {
    /// Creates an empty store whose first insert receives id 1.
    pub fn new() -> Self {
        Self::from_store(Store {
            posts: Vec::new(),
            next_id: FIRST_ID,
        })
    }

    /// Creates a store preloaded with `posts`, kept in the given order.
    ///
    /// The next assigned id is one past the largest preloaded id.
    ///
    /// # Errors
    /// - `InvalidId` when a post carries a non-positive id.
    /// - `DuplicateId` when two posts share an id.
    /// - `IdsExhausted` when the largest id leaves no room for another insert.
    pub fn with_posts(posts: impl IntoIterator<Item = BlogPost>) -> ServiceResult<Self> {
        let posts: Vec<BlogPost> = posts.into_iter().collect();
        let mut seen = HashSet::with_capacity(posts.len());
        let mut max_id = UNSAVED_ID;

        for post in &posts {
            if post.id <= UNSAVED_ID {
                return Err(ServiceError::InvalidId(post.id));
            }
            if !seen.insert(post.id) {
                return Err(ServiceError::DuplicateId(post.id));
            }
            max_id = max_id.max(post.id);
        }

        let next_id = max_id.checked_add(1).ok_or(ServiceError::IdsExhausted)?;
        Ok(Self::from_store(Store { posts, next_id }))
    }

    /// Creates a store holding the three canonical seed posts.
    pub fn seeded() -> Self {
        let posts = seed_posts();
        // Seed ids run 1..=len.
        let next_id = FIRST_ID + posts.len() as BlogPostId;
        Self::from_store(Store { posts, next_id })
    }

    fn from_store(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Drops every post and restarts id assignment at 1.
    pub fn reset(&self) -> ServiceResult<()> {
        let mut store = self.lock()?;
        store.posts.clear();
        store.next_id = FIRST_ID;
        debug!("event=store_reset module=service store=memory status=ok");
        Ok(())
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, Store>> {
        self.store.lock().map_err(|_| ServiceError::Poisoned)
    }
}

impl BlogPostService for InMemoryBlogPostService {
    fn get_all(&self) -> ServiceResult<Vec<BlogPost>> {
        Ok(self.lock()?.posts.clone())
    }

    fn get_by_id(&self, id: BlogPostId) -> ServiceResult<Option<BlogPost>> {
        let store = self.lock()?;
        Ok(store.posts.iter().find(|post| post.id == id).cloned())
    }

    fn insert(&self, mut post: BlogPost) -> ServiceResult<BlogPost> {
        let mut store = self.lock()?;
        let next_id = store
            .next_id
            .checked_add(1)
            .ok_or(ServiceError::IdsExhausted)?;
        post.id = store.next_id;
        store.next_id = next_id;
        store.posts.push(post.clone());
        debug!(
            "event=post_insert module=service store=memory status=ok id={}",
            post.id
        );
        Ok(post)
    }

    fn update(&self, post: &BlogPost) -> ServiceResult<()> {
        let mut store = self.lock()?;
        let index = store
            .position(post.id)
            .ok_or(ServiceError::NotFound(post.id))?;
        store.posts[index].apply_changes(post);
        Ok(())
    }

    fn delete(&self, id: BlogPostId) -> ServiceResult<()> {
        let mut store = self.lock()?;
        let index = store.position(id).ok_or(ServiceError::NotFound(id))?;
        store.posts.remove(index);
        Ok(())
    }
}
