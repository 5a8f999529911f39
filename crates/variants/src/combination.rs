//! Cartesian expansion of attribute lines into value tuples.

use std::collections::HashSet;

use skuforge_core::{VariantError, VariantResult};

use crate::attribute::{AttributeLine, AttributeValue};

/// One value per attribute line, in line order.
pub type Combination = Vec<AttributeValue>;

/// Reject lines that would corrupt the expected cardinality.
fn validate(lines: &[AttributeLine]) -> VariantResult<()> {
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if line.values.is_empty() {
            return Err(VariantError::structural(format!(
                "attribute line '{}' ({}) has no values",
                line.attribute_name, line.attribute_id
            )));
        }
        if !seen.insert(line.attribute_id) {
            return Err(VariantError::structural(format!(
                "attribute {} appears in more than one line",
                line.attribute_id
            )));
        }
    }
    Ok(())
}

/// Number of combinations the lines expand to, without enumerating them.
///
/// Empty input expands to nothing (the product has no variation).
pub fn cardinality(lines: &[AttributeLine]) -> VariantResult<usize> {
    validate(lines)?;
    if lines.is_empty() {
        return Ok(0);
    }
    lines.iter().try_fold(1usize, |acc, line| {
        acc.checked_mul(line.values.len())
            .ok_or_else(|| VariantError::structural("combination count overflows usize"))
    })
}

/// Lazy, restartable iterator over the Cartesian product of attribute lines.
///
/// The first line varies slowest and the last line fastest, so the output
/// order matches a nested loop over `lines[0]`, `lines[1]`, ...
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    lines: &'a [AttributeLine],
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> Combinations<'a> {
    pub fn new(lines: &'a [AttributeLine]) -> VariantResult<Self> {
        validate(lines)?;
        Ok(Self {
            lines,
            indices: vec![0; lines.len()],
            exhausted: lines.is_empty(),
        })
    }

    /// Rewind to the first combination.
    pub fn restart(&mut self) {
        self.indices.iter_mut().for_each(|i| *i = 0);
        self.exhausted = self.lines.is_empty();
    }

    fn advance(&mut self) {
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.lines[pos].values.len() {
                return;
            }
            self.indices[pos] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let tuple = self
            .indices
            .iter()
            .zip(self.lines)
            .map(|(&i, line)| line.values[i].clone())
            .collect();
        self.advance();
        Some(tuple)
    }
}

/// Materialize every combination of `lines`.
pub fn generate_combinations(lines: &[AttributeLine]) -> VariantResult<Vec<Combination>> {
    Ok(Combinations::new(lines)?.collect())
}
