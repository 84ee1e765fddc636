//! Request-to-result translation layer.
//!
//! The controller knows nothing about HTTP transport; hosts render
//! `ActionResult` values into real responses.

pub mod blog_post_controller;
