use serde::Deserialize;

/// Default cap on values in a single `in` / `not-in` filter
pub const DEFAULT_MAX_IN_VALUES: usize = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of values one membership filter may carry
    #[serde(default = "default_max_in_values")]
    pub max_in_values: usize,
}

fn default_max_in_values() -> usize {
    DEFAULT_MAX_IN_VALUES
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_in_values: default_max_in_values(),
        }
    }
}

impl StoreConfig {
    /// Load from `DOC_STORE_*` environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        let config = envy::prefixed("DOC_STORE_").from_env::<StoreConfig>()?;
        // A zero cap would make every membership query unservable
        Ok(Self {
            max_in_values: config.max_in_values.max(1),
        })
    }
}
