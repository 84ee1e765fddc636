//! Core domain logic for the blog post API.
//! Owns the post model, the persistence services and the controller.

pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;

pub use controller::blog_post_controller::{
    ActionResult, BlogPostController, ControllerOptions, Payload, BLOG_POST_ROUTE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::blog_post::{seed_posts, BlogPost, BlogPostId, BlogPostValidationError, UNSAVED_ID};
pub use service::blog_post_service::{BlogPostService, ServiceError, ServiceResult};
pub use service::database_service::DatabaseBlogPostService;
pub use service::in_memory_service::InMemoryBlogPostService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
