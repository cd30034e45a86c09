/// Database access layer
///
/// Posts live in a single top-level `posts` collection keyed by a
/// store-generated id.
pub mod post_repo;

pub use post_repo::{DocumentPostStore, PostStore, POSTS_COLLECTION};
