//! Variant engine error model.

use thiserror::Error;

/// Result type used across the variant engine.
pub type VariantResult<T> = Result<T, VariantError>;

/// Human-readable name of the attribute type a failed lookup targeted
/// (e.g. `"color"`, `"size-text"`).
pub type AttributeKindName = &'static str;

/// Variant-engine error.
///
/// Keep this focused on deterministic failures of the pure engine
/// (structure, code assignment, catalog lookups). Remote/storage failures
/// belong to the sync layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariantError {
    /// Attribute lines were empty or inconsistent (e.g. a line with no values).
    #[error("structural error: {0}")]
    Structural(String),

    /// No free code was found within the retry budget.
    #[error("no free code for '{code}' after {attempts} suffix attempts")]
    CollisionExhaustion { code: String, attempts: usize },

    /// A detected token has no entry in the attribute catalog.
    #[error("no {kind} attribute value named '{token}'")]
    LookupMiss {
        kind: AttributeKindName,
        token: String,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl VariantError {
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    pub fn collision_exhaustion(code: impl Into<String>, attempts: usize) -> Self {
        Self::CollisionExhaustion {
            code: code.into(),
            attempts,
        }
    }

    pub fn lookup_miss(kind: AttributeKindName, token: impl Into<String>) -> Self {
        Self::LookupMiss {
            kind,
            token: token.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Whether the error only affects a single item and should be reported
    /// as a warning rather than aborting the batch.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            VariantError::CollisionExhaustion { .. } | VariantError::LookupMiss { .. }
        )
    }
}
