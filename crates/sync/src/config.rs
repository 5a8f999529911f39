//! Sync engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_TEMPLATE_CACHE_TTL_SECS: &str = "SKUFORGE_TEMPLATE_CACHE_TTL_SECS";

pub const DEFAULT_TEMPLATE_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Lifetime of a cached template-code to template-id mapping.
    pub template_cache_ttl: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            template_cache_ttl: DEFAULT_TEMPLATE_CACHE_TTL,
        }
    }
}

impl SyncConfig {
    /// Defaults overridden by `SKUFORGE_TEMPLATE_CACHE_TTL_SECS`. Malformed
    /// values are logged and ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var(ENV_TEMPLATE_CACHE_TTL_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => cfg.template_cache_ttl = Duration::from_secs(secs),
                Err(_) => tracing::warn!(
                    key = ENV_TEMPLATE_CACHE_TTL_SECS,
                    value = %raw,
                    "ignoring malformed configuration value"
                ),
            }
        }
        cfg
    }

    pub fn with_template_cache_ttl(mut self, ttl: Duration) -> Self {
        self.template_cache_ttl = ttl;
        self
    }
}
