pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::FeedConfig;
pub use error::{FeedError, FeedStage, Result};
pub use models::{EnrichedPost, ProfileView, UNKNOWN_USERNAME};
pub use services::FeedComposer;
