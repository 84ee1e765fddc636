//! Blog post request handling.
//!
//! # Responsibility
//! - Delegate each request to the injected persistence service.
//! - Translate service outcomes into HTTP-style results.
//!
//! # Invariants
//! - `get_by_id` signals a miss with 204; `delete` signals a miss with 404.
//! - A successful delete answers 410 Gone.
//! - `put` on a missing id answers 404.
//! - Storage faults are returned as `Err` for the host to report.

use crate::model::blog_post::{BlogPost, BlogPostId};
use crate::service::blog_post_service::{BlogPostService, ServiceError, ServiceResult};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;

/// Route prefix the host mounts the controller under.
pub const BLOG_POST_ROUTE: &str = "/api/blogpost";

/// Outcome of one controller call, before the host renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// 200 with the full post list.
    OkPosts(Vec<BlogPost>),
    /// 200 with one post.
    OkPost(BlogPost),
    /// 200 without a body.
    OkEmpty,
    /// 201 with the stored post and the location to fetch it from.
    Created { location: String, post: BlogPost },
    /// 204, used for lookup misses.
    NoContent,
    /// 404, used for delete and update misses.
    NotFound,
    /// 410, used for successful deletes.
    Gone,
    /// 400 with the offending reason. Only produced with strict validation.
    BadRequest(String),
}

impl ActionResult {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::OkPosts(_) | Self::OkPost(_) | Self::OkEmpty => 200,
            Self::Created { .. } => 201,
            Self::NoContent => 204,
            Self::BadRequest(_) => 400,
            Self::NotFound => 404,
            Self::Gone => 410,
        }
    }

    /// JSON-ready payload, when the result carries one.
    pub fn payload(&self) -> Option<Payload<'_>> {
        match self {
            Self::OkPosts(posts) => Some(Payload::Posts(posts)),
            Self::OkPost(post) | Self::Created { post, .. } => Some(Payload::Post(post)),
            Self::BadRequest(reason) => Some(Payload::Error { error: reason }),
            Self::OkEmpty | Self::NoContent | Self::NotFound | Self::Gone => None,
        }
    }
}

/// Borrowed response body of an `ActionResult`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload<'a> {
    Posts(&'a [BlogPost]),
    Post(&'a BlogPost),
    Error { error: &'a str },
}

/// Behavior switches for `BlogPostController`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Reject posts with a blank title, author or content with 400.
    ///
    /// Off by default, in which case incomplete posts are stored as given.
    pub validate_required_fields: bool,
}

/// Maps blog post requests onto a `BlogPostService`.
pub struct BlogPostController<S: BlogPostService + ?Sized> {
    service: Arc<S>,
    options: ControllerOptions,
}

impl<S: BlogPostService + ?Sized> BlogPostController<S> {
    /// Creates a controller with default options.
    pub fn new(service: Arc<S>) -> Self {
        Self::with_options(service, ControllerOptions::default())
    }

    pub fn with_options(service: Arc<S>, options: ControllerOptions) -> Self {
        Self { service, options }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    /// Always 200 with every stored post.
    pub fn get_all_posts(&self) -> ServiceResult<ActionResult> {
        let posts = self.service.get_all()?;
        debug!(
            "event=get_all_posts module=controller status=ok count={}",
            posts.len()
        );
        Ok(ActionResult::OkPosts(posts))
    }

    /// 200 with the post, or 204 when `id` is not stored.
    pub fn get_by_id(&self, id: BlogPostId) -> ServiceResult<ActionResult> {
        match self.service.get_by_id(id)? {
            Some(post) => {
                debug!("event=get_by_id module=controller status=ok id={id}");
                Ok(ActionResult::OkPost(post))
            }
            None => {
                debug!("event=get_by_id module=controller status=no_content id={id}");
                Ok(ActionResult::NoContent)
            }
        }
    }

    /// 201 with the stored post and its location.
    pub fn insert_new_post(&self, post: BlogPost) -> ServiceResult<ActionResult> {
        if let Some(rejected) = self.reject_invalid("insert_new_post", &post) {
            return Ok(rejected);
        }

        let stored = self.service.insert(post)?;
        info!(
            "event=insert_new_post module=controller status=created id={}",
            stored.id
        );
        Ok(ActionResult::Created {
            location: format!("{BLOG_POST_ROUTE}/{}", stored.id),
            post: stored,
        })
    }

    /// 410 when the post existed and was removed, 404 otherwise.
    pub fn delete(&self, id: BlogPostId) -> ServiceResult<ActionResult> {
        if self.service.get_by_id(id)?.is_none() {
            info!("event=delete module=controller status=not_found id={id}");
            return Ok(ActionResult::NotFound);
        }

        match self.service.delete(id) {
            Ok(()) => {
                info!("event=delete module=controller status=gone id={id}");
                Ok(ActionResult::Gone)
            }
            // Removed by someone else between the lookup and the delete.
            Err(ServiceError::NotFound(_)) => {
                info!("event=delete module=controller status=not_found id={id}");
                Ok(ActionResult::NotFound)
            }
            Err(err) => Err(err),
        }
    }

    /// 200 after overwriting the stored post, 404 when `post.id` is unknown.
    pub fn put(&self, post: &BlogPost) -> ServiceResult<ActionResult> {
        if let Some(rejected) = self.reject_invalid("put", post) {
            return Ok(rejected);
        }

        match self.service.update(post) {
            Ok(()) => {
                info!("event=put module=controller status=ok id={}", post.id);
                Ok(ActionResult::OkEmpty)
            }
            Err(ServiceError::NotFound(id)) => {
                info!("event=put module=controller status=not_found id={id}");
                Ok(ActionResult::NotFound)
            }
            Err(err) => Err(err),
        }
    }

    fn reject_invalid(&self, event: &str, post: &BlogPost) -> Option<ActionResult> {
        if !self.options.validate_required_fields {
            return None;
        }

        let err = post.validate().err()?;
        info!(
            "event={event} module=controller status=bad_request field={}",
            err.field()
        );
        Some(ActionResult::BadRequest(err.to_string()))
    }
}
