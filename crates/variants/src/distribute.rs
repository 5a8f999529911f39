//! Splitting one purchased quantity across the variants a description names.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DistributionConfig, RemainderPolicy};
use crate::detect::{AttributeDetector, Detection};

/// Quantity assigned to one variant label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerVariant {
    /// Comma-joined value names, e.g. `"S, Đỏ"`.
    pub label: String,
    pub quantity: u32,
    /// `false` for an unrecognized token carried through with the full total.
    pub expanded: bool,
}

/// Result of distributing a quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub lines: Vec<PerVariant>,
    /// Tokens no detector recognized; each also has its own unexpanded line.
    pub unrecognized: Vec<String>,
    /// Units not allocated to any line (only under [`RemainderPolicy::Drop`]).
    pub remainder: u32,
}

impl Distribution {
    /// Units split across expanded lines. Unexpanded lines each repeat the
    /// full total and are not counted.
    pub fn total_allocated(&self) -> u32 {
        self.lines.iter().filter(|l| l.expanded).map(|l| l.quantity).sum()
    }
}

/// Cartesian product of per-kind token lists, joined into labels.
fn combine_labels(groups: &[&[String]]) -> Vec<String> {
    groups.iter().fold(vec![String::new()], |acc, group| {
        acc.iter()
            .flat_map(|prefix| {
                group.iter().map(move |token| {
                    if prefix.is_empty() {
                        token.clone()
                    } else {
                        format!("{prefix}, {token}")
                    }
                })
            })
            .collect()
    })
}

/// Divides a quantity evenly across detected variant labels.
#[derive(Debug, Clone)]
pub struct QuantityDistributor<D> {
    detector: D,
    config: DistributionConfig,
}

impl<D: AttributeDetector> QuantityDistributor<D> {
    pub fn new(detector: D) -> Self {
        Self::with_config(detector, DistributionConfig::default())
    }

    pub fn with_config(detector: D, config: DistributionConfig) -> Self {
        Self { detector, config }
    }

    /// Distribute `total` across the variants named by raw `tokens`.
    ///
    /// Tokens are classified by the detector and grouped per attribute type.
    /// One type splits across its distinct values; several types split across
    /// the Cartesian product of their values. Each label receives
    /// `total / labels`; what happens to the remainder depends on the
    /// configured [`RemainderPolicy`]. Every token the detector does not
    /// recognize is carried through as its own unexpanded line with the full
    /// total, after the expanded lines.
    pub fn distribute<S: AsRef<str>>(&self, total: u32, tokens: &[S]) -> Distribution {
        let mut detection = Detection::default();
        let mut unknown = Vec::new();
        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            let found = self.detector.detect(token);
            if found.is_empty() {
                unknown.push(token.to_string());
            } else {
                detection.merge(found);
            }
        }

        let carried: Vec<PerVariant> = unknown
            .iter()
            .map(|token| PerVariant {
                label: token.clone(),
                quantity: total,
                expanded: false,
            })
            .collect();

        let kinds = detection.kinds();
        if kinds.is_empty() {
            if !carried.is_empty() {
                debug!(tokens = carried.len(), "no variant detected; keeping single lines");
            }
            return Distribution {
                lines: carried,
                unrecognized: unknown,
                remainder: 0,
            };
        }

        for token in &unknown {
            warn!(token = %token, "variant token not recognized; carried through unexpanded");
        }

        let groups: Vec<&[String]> = kinds.iter().map(|k| detection.tokens(*k)).collect();
        let labels = combine_labels(&groups);
        let count = labels.len() as u32;
        let per_variant = total / count;
        let leftover = total % count;

        let (remainder, bonus) = match self.config.remainder {
            RemainderPolicy::Drop => (leftover, 0),
            RemainderPolicy::FirstVariants => (0, leftover),
        };
        if remainder > 0 {
            warn!(total, labels = count, remainder, "quantity remainder dropped");
        }

        let mut lines: Vec<PerVariant> = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| PerVariant {
                label,
                quantity: per_variant + u32::from((i as u32) < bonus),
                expanded: true,
            })
            .collect();
        lines.extend(carried);

        Distribution {
            lines,
            unrecognized: unknown,
            remainder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::StaticAttributeCatalog;
    use crate::detect::CatalogDetector;

    fn distributor(policy: RemainderPolicy) -> QuantityDistributor<CatalogDetector<StaticAttributeCatalog>> {
        QuantityDistributor::with_config(
            CatalogDetector::new(StaticAttributeCatalog::builtin()),
            DistributionConfig::default().with_remainder(policy),
        )
    }

    fn labels(d: &Distribution) -> Vec<&str> {
        d.lines.iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn single_type_splits_evenly() {
        let d = distributor(RemainderPolicy::Drop).distribute(10, &["Đỏ", "Đen"]);
        assert_eq!(labels(&d), vec!["Đỏ", "Đen"]);
        assert!(d.lines.iter().all(|l| l.quantity == 5 && l.expanded));
        assert_eq!(d.total_allocated(), 10);
        assert_eq!(d.remainder, 0);
    }

    #[test]
    fn one_value_per_type_is_one_combination() {
        let d = distributor(RemainderPolicy::Drop).distribute(10, &["S", "Đỏ"]);
        assert_eq!(labels(&d), vec!["S, Đỏ"]);
        assert_eq!(d.lines[0].quantity, 10);
    }

    #[test]
    fn cross_type_remainder_is_dropped_by_default() {
        let d = distributor(RemainderPolicy::Drop).distribute(10, &["S", "M", "Đỏ", "Đen"]);
        assert_eq!(labels(&d), vec!["S, Đỏ", "S, Đen", "M, Đỏ", "M, Đen"]);
        assert!(d.lines.iter().all(|l| l.quantity == 2));
        assert_eq!(d.total_allocated(), 8);
        assert_eq!(d.remainder, 2);
    }

    #[test]
    fn first_variants_policy_preserves_total() {
        let d = distributor(RemainderPolicy::FirstVariants)
            .distribute(10, &["S", "M", "Đỏ", "Đen"]);
        let quantities: Vec<_> = d.lines.iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![3, 3, 2, 2]);
        assert_eq!(d.total_allocated(), 10);
        assert_eq!(d.remainder, 0);
    }

    #[test]
    fn duplicate_tokens_count_once() {
        let d = distributor(RemainderPolicy::Drop).distribute(9, &["L", "l", "XL"]);
        assert_eq!(labels(&d), vec!["L", "XL"]);
        assert_eq!(d.remainder, 1);
    }

    #[test]
    fn undetected_description_is_carried_through() {
        let d = distributor(RemainderPolicy::Drop).distribute(7, &["hàng mới"]);
        assert_eq!(
            d.lines,
            vec![PerVariant {
                label: "hàng mới".to_string(),
                quantity: 7,
                expanded: false,
            }]
        );
        assert_eq!(d.unrecognized, vec!["hàng mới"]);
    }

    #[test]
    fn unknown_token_beside_detected_one_keeps_full_total() {
        let d = distributor(RemainderPolicy::Drop).distribute(10, &["Đỏ", "Áo khoác"]);
        assert_eq!(
            d.lines,
            vec![
                PerVariant {
                    label: "Đỏ".to_string(),
                    quantity: 10,
                    expanded: true,
                },
                PerVariant {
                    label: "Áo khoác".to_string(),
                    quantity: 10,
                    expanded: false,
                },
            ]
        );
        assert_eq!(d.unrecognized, vec!["Áo khoác"]);
        assert_eq!(d.total_allocated(), 10);
    }

    #[test]
    fn each_unknown_token_gets_its_own_line() {
        let d = distributor(RemainderPolicy::Drop).distribute(6, &["Đỏ", "hàng mới", "Đen", "Áo khoác"]);
        assert_eq!(labels(&d), vec!["Đỏ", "Đen", "hàng mới", "Áo khoác"]);
        let unexpanded: Vec<_> = d.lines.iter().filter(|l| !l.expanded).map(|l| l.quantity).collect();
        assert_eq!(unexpanded, vec![6, 6]);
        assert_eq!(d.total_allocated(), 6);
    }

    #[test]
    fn no_tokens_distribute_nothing() {
        let empty: [&str; 0] = [];
        assert_eq!(
            distributor(RemainderPolicy::Drop).distribute(5, &empty),
            Distribution::default()
        );
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        const POOL: [&str; 8] = ["S", "M", "L", "Đỏ", "Đen", "Trắng", "28", "30"];

        proptest! {
            /// Property: allocated units plus the reported remainder equal the total.
            #[test]
            fn nothing_is_lost_silently(
                total in 0u32..1_000,
                picks in prop::collection::vec(0usize..POOL.len(), 1..8),
                keep_remainder in any::<bool>(),
            ) {
                let tokens: Vec<&str> = picks.iter().map(|&i| POOL[i]).collect();
                let policy = if keep_remainder { RemainderPolicy::FirstVariants } else { RemainderPolicy::Drop };
                let d = distributor(policy).distribute(total, &tokens);

                prop_assert_eq!(d.total_allocated() + d.remainder, total);
                if keep_remainder {
                    prop_assert_eq!(d.remainder, 0);
                }
                let max = d.lines.iter().map(|l| l.quantity).max().unwrap_or(0);
                let min = d.lines.iter().map(|l| l.quantity).min().unwrap_or(0);
                prop_assert!(max - min <= 1);
            }
        }
    }
}
