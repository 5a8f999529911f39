//! Canonical variant identity independent of code and name.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;
use crate::variant::GeneratedVariant;

/// Sorted, comma-joined attribute value ids.
///
/// The empty signature belongs to base products (no attribute values); such
/// variants never take part in identity matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn signature_of(values: &[AttributeValue]) -> Signature {
    let mut ids: Vec<i64> = values.iter().map(|v| v.id.get()).collect();
    ids.sort_unstable();
    let joined = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Signature(joined)
}

pub fn signature(variant: &GeneratedVariant) -> Signature {
    signature_of(&variant.attribute_values)
}
