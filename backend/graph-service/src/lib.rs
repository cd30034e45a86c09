pub mod domain;
pub mod error;
pub mod repository;

pub use domain::edge::{FollowEdge, GraphStats};
pub use error::{GraphError, Result};
pub use repository::{DocumentGraphRepository, GraphRepositoryTrait};
