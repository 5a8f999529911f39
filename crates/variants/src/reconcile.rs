//! Identity diff between an expected and an actual variant set.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::signature::Signature;
use crate::variant::GeneratedVariant;

/// An expected variant paired with the actual variant that has its signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantMatch {
    pub expected: GeneratedVariant,
    pub actual: GeneratedVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantDiff {
    pub matches: Vec<VariantMatch>,
    /// Expected variants with no actual counterpart.
    pub missing: Vec<GeneratedVariant>,
    /// Actual variants (with a non-empty signature) nothing expected claimed.
    pub extra: Vec<GeneratedVariant>,
}

impl VariantDiff {
    pub fn is_in_sync(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// One-to-one match of `expected` against `actual` by exact signature.
///
/// Each actual variant is consumed by at most one expected variant. Actual
/// variants without attribute values never match and are not reported as
/// extra; expected variants without attribute values are always missing.
/// `missing` follows `expected` order and `extra` follows `actual` order.
pub fn diff(expected: &[GeneratedVariant], actual: &[GeneratedVariant]) -> VariantDiff {
    let mut by_signature: HashMap<Signature, VecDeque<usize>> = HashMap::new();
    for (idx, variant) in actual.iter().enumerate() {
        let sig = variant.signature();
        if !sig.is_empty() {
            by_signature.entry(sig).or_default().push_back(idx);
        }
    }

    let mut consumed = vec![false; actual.len()];
    let mut result = VariantDiff::default();

    for variant in expected {
        let sig = variant.signature();
        let hit = if sig.is_empty() {
            None
        } else {
            by_signature.get_mut(&sig).and_then(VecDeque::pop_front)
        };

        match hit {
            Some(idx) => {
                consumed[idx] = true;
                result.matches.push(VariantMatch {
                    expected: variant.clone(),
                    actual: actual[idx].clone(),
                });
            }
            None => result.missing.push(variant.clone()),
        }
    }

    result.extra = actual
        .iter()
        .zip(&consumed)
        .filter(|(v, used)| !**used && !v.attribute_values.is_empty())
        .map(|(v, _)| v.clone())
        .collect();

    result
}
