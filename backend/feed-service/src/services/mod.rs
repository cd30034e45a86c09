/// Feed composition over the graph, post and user stores
pub mod composer;

pub use composer::FeedComposer;
