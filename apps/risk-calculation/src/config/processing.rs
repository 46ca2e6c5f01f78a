//! Batch processing configuration.

use serde::{Deserialize, Serialize};

use super::currency::default_true;

/// Batch processing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Exposure count from which batches are processed in parallel chunks.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Exposures per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Worker threads, 0 for the rayon default.
    #[serde(default)]
    pub max_threads: usize,
    /// Abort a batch when a rate is unavailable.
    #[serde(default = "default_true")]
    pub fail_on_unavailable_rate: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            chunk_size: default_chunk_size(),
            max_threads: 0,
            fail_on_unavailable_rate: true,
        }
    }
}

const fn default_parallel_threshold() -> usize {
    2000
}

const fn default_chunk_size() -> usize {
    500
}
