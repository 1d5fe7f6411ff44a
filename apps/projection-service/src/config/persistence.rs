//! Projection record storage configuration.

use serde::{Deserialize, Serialize};

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Projections kept in memory before the oldest are evicted.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
        }
    }
}

const fn default_max_records() -> usize {
    1000
}
