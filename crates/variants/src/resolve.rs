//! Resolution of detected tokens into catalog-backed attribute lines.

use tracing::warn;

use skuforge_core::VariantError;

use crate::attribute::{AttributeKind, AttributeLine, AttributeRegistry, AttributeValue};
use crate::detect::Detection;

/// Attribute lines built from a detection, plus the tokens the catalog did
/// not know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineResolution {
    pub lines: Vec<AttributeLine>,
    /// One `LookupMiss` per unresolved token.
    pub warnings: Vec<VariantError>,
}

/// Resolve each detected token through `registry`.
///
/// Unknown tokens are skipped (no id is fabricated) and reported as
/// warnings. A kind whose tokens all miss contributes no line, so the
/// remaining lines still expand cleanly.
pub fn resolve_lines<R>(registry: &R, detection: &Detection) -> LineResolution
where
    R: AttributeRegistry + ?Sized,
{
    let mut resolution = LineResolution::default();

    for kind in AttributeKind::ALL {
        let mut values: Vec<AttributeValue> = Vec::new();
        for token in detection.tokens(kind) {
            match registry.lookup(kind, token) {
                Some(value) => {
                    if !values.iter().any(|v| v.id == value.id) {
                        values.push(value);
                    }
                }
                None => {
                    warn!(kind = kind.label(), token = %token, "attribute value not in catalog");
                    resolution
                        .warnings
                        .push(VariantError::lookup_miss(kind.label(), token.clone()));
                }
            }
        }
        if !values.is_empty() {
            resolution.lines.push(AttributeLine::for_kind(kind, values));
        }
    }

    resolution
}
