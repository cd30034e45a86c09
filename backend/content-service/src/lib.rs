/// Content Service Library
///
/// Stores posts and answers the author-scoped queries the feeds are built from.
///
/// # Modules
///
/// - `models`: Post records and the new-post form
/// - `db`: Post store trait and its document-store implementation
/// - `error`: Error types and handling
pub mod db;
pub mod error;
pub mod models;

pub use db::{DocumentPostStore, PostStore, POSTS_COLLECTION};
pub use error::{ContentError, Result};
pub use models::{NewPost, Post, PostRecord};
