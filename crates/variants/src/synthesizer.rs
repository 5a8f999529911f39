//! Expansion of a base product into its full variant set.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skuforge_core::{VariantError, VariantId, VariantResult};

use crate::attribute::AttributeLine;
use crate::code::CodeAssigner;
use crate::combination::{Combination, Combinations, cardinality};
use crate::config::SynthesisConfig;
use crate::name::compose_name;
use crate::variant::{BaseProduct, GeneratedVariant};

/// A combination that could not be turned into a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedCombination {
    pub combination: Combination,
    pub reason: String,
}

/// Outcome of one synthesis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub variants: Vec<GeneratedVariant>,
    /// Combinations whose code assignment was exhausted; fatal only for that
    /// variant.
    pub rejected: Vec<RejectedCombination>,
}

/// Orchestrates combination → code → name for a base product.
///
/// Pure: the used-code set lives only for the duration of one call, so
/// concurrent runs never share state. Two concurrent runs over the same base
/// product can still pick the same code; callers serialize those.
#[derive(Debug, Clone, Default)]
pub struct VariantSynthesizer {
    config: SynthesisConfig,
}

impl VariantSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Generate every variant for `product`. An empty `lines` slice yields an
    /// empty set ("no variation"), not an error.
    ///
    /// Combinations rejected for code exhaustion are left out and only logged;
    /// use [`synthesize_report`](Self::synthesize_report) to receive them.
    pub fn synthesize(
        &self,
        product: &BaseProduct,
        lines: &[AttributeLine],
    ) -> VariantResult<Vec<GeneratedVariant>> {
        self.synthesize_with_existing(product, lines, core::iter::empty::<&str>())
    }

    /// Like [`synthesize`](Self::synthesize), but never reuses any of the
    /// `existing` codes already known for the base product. Rejected
    /// combinations are dropped here too.
    pub fn synthesize_with_existing<I, S>(
        &self,
        product: &BaseProduct,
        lines: &[AttributeLine],
        existing: I,
    ) -> VariantResult<Vec<GeneratedVariant>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.synthesize_report(product, lines, existing)?.variants)
    }

    /// Full run report, including combinations rejected for code exhaustion.
    ///
    /// Structural problems with `lines` fail the whole run before any code is
    /// assigned.
    pub fn synthesize_report<I, S>(
        &self,
        product: &BaseProduct,
        lines: &[AttributeLine],
        existing: I,
    ) -> VariantResult<Synthesis>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let expected = cardinality(lines)?;
        debug!(
            base_code = %product.default_code,
            lines = lines.len(),
            expected,
            "synthesizing variants"
        );

        let mut report = Synthesis {
            variants: Vec::with_capacity(expected),
            rejected: Vec::new(),
        };
        if lines.is_empty() {
            return Ok(report);
        }

        let mut codes = CodeAssigner::seeded(existing, self.config.max_collision_retries);
        for combination in Combinations::new(lines)? {
            match codes.assign(&product.default_code, &combination) {
                Ok(default_code) => {
                    let name = compose_name(&product.name, &combination);
                    report.variants.push(GeneratedVariant {
                        id: VariantId::new(0),
                        name_get: name.clone(),
                        name,
                        default_code,
                        attribute_values: combination,
                        active: true,
                        product_template_id: product.id,
                        price_variant: product.list_price,
                    });
                }
                Err(err @ VariantError::CollisionExhaustion { .. }) => {
                    warn!(base_code = %product.default_code, error = %err, "variant rejected");
                    report.rejected.push(RejectedCombination {
                        combination,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::attribute::{AttributeKind, AttributeValue};
    use skuforge_core::TemplateId;

    fn line(kind: AttributeKind, base_id: i64, codes: &[&str]) -> AttributeLine {
        let values = codes
            .iter()
            .enumerate()
            .map(|(i, c)| AttributeValue::new(kind, base_id + i as i64, *c, *c))
            .collect();
        AttributeLine::for_kind(kind, values)
    }

    fn shirt() -> BaseProduct {
        BaseProduct::new(42, "Shirt", "NTEST", 150_000.0)
    }

    #[test]
    fn single_line_scenario() {
        let lines = vec![line(AttributeKind::TextSize, 1, &["S", "M"])];
        let variants = VariantSynthesizer::default()
            .synthesize(&shirt(), &lines)
            .unwrap();

        let codes: Vec<_> = variants.iter().map(|v| v.default_code.as_str()).collect();
        let names: Vec<_> = variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(codes, vec!["NTESTS", "NTESTM"]);
        assert_eq!(names, vec!["Shirt (S)", "Shirt (M)"]);
        for v in &variants {
            assert_eq!(v.name_get, v.name);
            assert_eq!(v.id, VariantId::new(0));
            assert!(!v.is_persisted());
            assert!(v.active);
            assert_eq!(v.product_template_id, TemplateId::new(42));
            assert_eq!(v.price_variant, 150_000.0);
        }
    }

    #[test]
    fn colliding_fragments_are_suffixed() {
        let product = BaseProduct::new(7, "Quần", "N497", 0.0);
        let lines = vec![
            line(AttributeKind::Color, 1, &["den", "do"]),
            line(AttributeKind::NumberSize, 10, &["28", "30"]),
        ];
        let variants = VariantSynthesizer::default()
            .synthesize(&product, &lines)
            .unwrap();

        let codes: Vec<_> = variants.iter().map(|v| v.default_code.as_str()).collect();
        assert_eq!(codes, vec!["N497D28", "N497D30", "N497D281", "N497D301"]);
    }

    #[test]
    fn no_lines_means_no_variation() {
        let variants = VariantSynthesizer::default()
            .synthesize(&shirt(), &[])
            .unwrap();
        assert!(variants.is_empty());
    }

    #[test]
    fn structural_errors_fail_fast() {
        let lines = vec![line(AttributeKind::Color, 1, &[])];
        let err = VariantSynthesizer::default()
            .synthesize(&shirt(), &lines)
            .unwrap_err();
        assert!(matches!(err, VariantError::Structural(_)));
    }

    #[test]
    fn existing_codes_are_avoided() {
        let lines = vec![line(AttributeKind::TextSize, 1, &["S", "M"])];
        let variants = VariantSynthesizer::default()
            .synthesize_with_existing(&shirt(), &lines, ["NTESTS"])
            .unwrap();
        let codes: Vec<_> = variants.iter().map(|v| v.default_code.as_str()).collect();
        assert_eq!(codes, vec!["NTESTS1", "NTESTM"]);
    }

    #[test]
    fn exhausted_combinations_are_reported_not_fatal() {
        let synthesizer =
            VariantSynthesizer::new(SynthesisConfig::default().with_max_collision_retries(1));
        let lines = vec![line(AttributeKind::TextSize, 1, &["S", "M"])];
        let report = synthesizer
            .synthesize_report(&shirt(), &lines, ["NTESTS", "NTESTS1"])
            .unwrap();

        assert_eq!(report.variants.len(), 1);
        assert_eq!(report.variants[0].default_code, "NTESTM");
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].combination[0].code, "S");
        assert!(report.rejected[0].reason.contains("NTESTS"));
    }

    #[test]
    fn plain_synthesis_omits_rejected_combinations() {
        let synthesizer =
            VariantSynthesizer::new(SynthesisConfig::default().with_max_collision_retries(1));
        let lines = vec![line(AttributeKind::TextSize, 1, &["S", "M"])];
        let existing = ["NTESTS", "NTESTS1"];

        let variants = synthesizer
            .synthesize_with_existing(&shirt(), &lines, existing)
            .unwrap();
        let report = synthesizer
            .synthesize_report(&shirt(), &lines, existing)
            .unwrap();

        assert_eq!(variants, report.variants);
        assert_eq!(variants.len() + report.rejected.len(), 2);
    }

    #[test]
    fn rerun_with_same_seed_is_deterministic() {
        let lines = vec![
            line(AttributeKind::TextSize, 1, &["S", "Số", "M"]),
            line(AttributeKind::Color, 20, &["den", "do"]),
        ];
        let synthesizer = VariantSynthesizer::default();
        let a = synthesizer.synthesize(&shirt(), &lines).unwrap();
        let b = synthesizer.synthesize(&shirt(), &lines).unwrap();
        assert_eq!(a, b);

        let unique: HashSet<_> = a.iter().map(|v| v.default_code.clone()).collect();
        assert_eq!(unique.len(), a.len());
    }
}
