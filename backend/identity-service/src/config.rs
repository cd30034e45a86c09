//! Configuration for the identity gateway
//!
//! Loaded from `AUTH_*` environment variables; every setting has a default.

use argon2::Params;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Shortest password accepted at sign-up
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Argon2 memory cost in KiB
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 lanes
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Capacity of the auth-state broadcast buffer per subscriber
    #[serde(default = "default_auth_event_capacity")]
    pub auth_event_capacity: usize,
}

// Default values
fn default_min_password_length() -> usize {
    6
}

fn default_argon2_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}

fn default_argon2_iterations() -> u32 {
    Params::DEFAULT_T_COST
}

fn default_argon2_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

fn default_auth_event_capacity() -> usize {
    64
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            auth_event_capacity: default_auth_event_capacity(),
        }
    }
}

impl IdentityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("AUTH_").from_env::<IdentityConfig>()
    }

    /// Cheapest valid Argon2 cost, for tests and local tooling
    pub fn low_cost() -> Self {
        Self {
            argon2_memory_kib: Params::MIN_M_COST,
            argon2_iterations: Params::MIN_T_COST,
            argon2_parallelism: Params::MIN_P_COST,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = IdentityConfig::default();
        assert_eq!(config.min_password_length, 6);
        assert_eq!(config.argon2_memory_kib, Params::DEFAULT_M_COST);
        assert_eq!(config.auth_event_capacity, 64);
    }
}
