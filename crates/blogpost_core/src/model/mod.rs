//! Domain model for the blog post API.
//!
//! # Responsibility
//! - Define the record shared by controller, services and storage.
//!
//! # Invariants
//! - Every stored post is identified by a store-assigned integer id.
//! - Deletion is a hard delete; there are no tombstones.

pub mod blog_post;
