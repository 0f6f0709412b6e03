// src/error.rs
// =============================================================================
// Errors that stop a crawl before it starts.
//
// Everything that goes wrong *during* a crawl (404s, timeouts, DNS failures)
// is per-URL and ends up in the `errors` list of the result instead. See
// page::Failure for those.
// =============================================================================

use crate::normalize::NormalizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No url provided")]
    EmptySeed,

    #[error("Invalid seed URL '{seed}': {source}")]
    InvalidSeed {
        seed: String,
        #[source]
        source: NormalizeError,
    },

    #[error("Maximum depth must be greater than zero")]
    ZeroDepth,
}
