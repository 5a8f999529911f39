//! Engine configuration (defaults, builders, environment overrides).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::code::DEFAULT_MAX_COLLISION_RETRIES;

pub const ENV_MAX_CODE_RETRIES: &str = "SKUFORGE_MAX_CODE_RETRIES";
pub const ENV_REMAINDER_POLICY: &str = "SKUFORGE_REMAINDER_POLICY";

/// Read and parse an environment variable, warning and returning `None` on
/// malformed values.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring malformed configuration value");
            None
        }
    }
}

/// Variant synthesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Suffix retries before a code collision is declared unresolvable.
    pub max_collision_retries: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_collision_retries: DEFAULT_MAX_COLLISION_RETRIES,
        }
    }
}

impl SynthesisConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(retries) = env_parse::<usize>(ENV_MAX_CODE_RETRIES) {
            cfg.max_collision_retries = retries;
        }
        cfg
    }

    pub fn with_max_collision_retries(mut self, retries: usize) -> Self {
        self.max_collision_retries = retries;
        self
    }
}

/// What happens to the units left over by floor division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Drop the remainder; it is reported on the distribution result.
    #[default]
    Drop,
    /// Give one extra unit to each of the first `remainder` variants.
    FirstVariants,
}

impl FromStr for RemainderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(RemainderPolicy::Drop),
            "first" | "first-variants" => Ok(RemainderPolicy::FirstVariants),
            other => Err(format!("unknown remainder policy '{other}'")),
        }
    }
}

/// Quantity distribution configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub remainder: RemainderPolicy,
}

impl DistributionConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(policy) = env_parse::<RemainderPolicy>(ENV_REMAINDER_POLICY) {
            cfg.remainder = policy;
        }
        cfg
    }

    pub fn with_remainder(mut self, remainder: RemainderPolicy) -> Self {
        self.remainder = remainder;
        self
    }
}
