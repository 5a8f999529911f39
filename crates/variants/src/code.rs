//! Deterministic, collision-free variant code assignment.

use std::collections::HashSet;

use skuforge_core::{VariantError, VariantResult};

use crate::attribute::AttributeValue;

/// Retry budget for suffix resolution before giving up on a variant.
pub const DEFAULT_MAX_COLLISION_RETRIES: usize = 50;

/// Code fragment contributed by one attribute value.
///
/// Purely numeric codes are kept verbatim; anything else contributes its
/// upper-cased first character (falling back to the name when the code is
/// blank).
pub fn code_fragment(value: &AttributeValue) -> String {
    let code = value.code.trim();
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        return code.to_string();
    }

    let source = if code.is_empty() { value.name.trim() } else { code };
    source
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Base code followed by every value's fragment, in tuple order.
pub fn naive_code(base_code: &str, tuple: &[AttributeValue]) -> String {
    let mut code = base_code.to_string();
    for value in tuple {
        code.push_str(&code_fragment(value));
    }
    code
}

fn used_key(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Assigns unique codes against a running set of used codes.
///
/// The set is scoped to one synthesis run: seed it with the codes that
/// already exist for the base product and it will never hand out any of
/// them, nor any code it produced earlier. Codes are compared
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct CodeAssigner {
    used: HashSet<String>,
    max_retries: usize,
}

impl Default for CodeAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COLLISION_RETRIES)
    }
}

impl CodeAssigner {
    pub fn new(max_retries: usize) -> Self {
        Self {
            used: HashSet::new(),
            max_retries,
        }
    }

    pub fn seeded<I, S>(existing: I, max_retries: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut assigner = Self::new(max_retries);
        assigner
            .used
            .extend(existing.into_iter().map(|c| used_key(c.as_ref())));
        assigner
    }

    pub fn is_used(&self, code: &str) -> bool {
        self.used.contains(&used_key(code))
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Derive a code for `tuple` and reserve it.
    ///
    /// On collision a suffix of `"1"`s is appended, one longer per retry.
    pub fn assign(&mut self, base_code: &str, tuple: &[AttributeValue]) -> VariantResult<String> {
        let naive = naive_code(base_code, tuple);
        if self.used.insert(used_key(&naive)) {
            return Ok(naive);
        }

        let mut candidate = naive.clone();
        for _ in 0..self.max_retries {
            candidate.push('1');
            if self.used.insert(used_key(&candidate)) {
                return Ok(candidate);
            }
        }

        Err(VariantError::collision_exhaustion(naive, self.max_retries))
    }
}
