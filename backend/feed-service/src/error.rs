use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fetch step of a feed or profile build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStage {
    Following,
    Followers,
    Posts,
}

impl fmt::Display for FeedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            FeedStage::Following => "following",
            FeedStage::Followers => "followers",
            FeedStage::Posts => "posts",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed unavailable: failed to load {stage}")]
    FeedUnavailable {
        stage: FeedStage,
        #[source]
        source: BoxError,
    },
}

impl FeedError {
    pub fn stage(&self) -> FeedStage {
        match self {
            FeedError::FeedUnavailable { stage, .. } => *stage,
        }
    }
}

/// Tag a failed fetch with the stage it belongs to
pub trait StageExt<T> {
    fn or_unavailable(self, stage: FeedStage) -> Result<T>;
}

impl<T, E> StageExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn or_unavailable(self, stage: FeedStage) -> Result<T> {
        self.map_err(|err| FeedError::FeedUnavailable {
            stage,
            source: Box::new(err),
        })
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
