// src/crawl/config.rs
// =============================================================================
// Settings for one crawl.
//
// max_depth counts rounds, not hops from the seed:
//   max_depth = 1 -> only the seed page is fetched and classified
//   max_depth = 2 -> the seed plus every page it links to
//   ...
// =============================================================================

use crate::error::ConfigError;
use clap::ValueEnum;

// What to do with links that already carry a scheme and host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LinkPolicy {
    /// Follow absolute links under the seed URL; record other origins as
    /// external without fetching them
    #[default]
    SameOrigin,
    /// Ignore absolute links completely and follow relative ones only
    RelativeOnly,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_depth: usize,
    pub link_policy: LinkPolicy,
    /// Probe each URL with HEAD before downloading it
    pub use_head: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            link_policy: LinkPolicy::SameOrigin,
            use_head: false,
        }
    }
}

impl CrawlConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}
