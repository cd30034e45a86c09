use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum in-flight author lookups while enriching a feed
    #[serde(default = "default_author_lookup_concurrency")]
    pub author_lookup_concurrency: usize,
}

fn default_author_lookup_concurrency() -> usize {
    8
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            author_lookup_concurrency: default_author_lookup_concurrency(),
        }
    }
}

impl FeedConfig {
    /// Load from `FEED_*` environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        let mut config = envy::prefixed("FEED_").from_env::<FeedConfig>()?;
        config.author_lookup_concurrency = config.author_lookup_concurrency.max(1);
        Ok(config)
    }
}
