//! Persistence services for blog posts.
//!
//! # Responsibility
//! - Define the storage capability the controller depends on.
//! - Provide the collection-backed and database-backed variants.
//!
//! # Invariants
//! - Variants are interchangeable behind `BlogPostService`.
//! - Callers pick a variant by constructing it; there is no registry.

pub mod blog_post_service;
pub mod database_service;
pub mod in_memory_service;
