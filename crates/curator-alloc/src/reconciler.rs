//! Surplus redistribution between planned shares and estimated usage.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use tracing::debug;

use curator_core::types::CategoryId;

use crate::estimator::Estimate;

/// Shares after surplus redistribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Per-category share, never above the category's estimated usage.
    pub shares: BTreeMap<CategoryId, f64>,
    /// Surplus that found no recipient (only when no category was needy).
    pub unallocated: f64,
}

impl Reconciled {
    pub fn share(&self, category: &CategoryId) -> f64 {
        self.shares.get(category).copied().unwrap_or(0.0)
    }
}

/// Compare planned shares against estimated usage and move surplus from
/// categories that need less than planned to the ones that need more.
///
/// A category whose share exceeds its usage is capped at the usage and the
/// difference enters the remainder; a category with no items at all forfeits
/// its entire share. Categories at or above their share are *needy* and
/// receive the remainder via [`distribute_remainder`].
pub fn reconcile(share: &BTreeMap<CategoryId, f64>, usage: &Estimate) -> Reconciled {
    let mut shares = BTreeMap::new();
    let mut remainder = 0.0;
    let mut needy: Vec<CategoryId> = Vec::new();

    for (category, &planned) in share {
        match usage.by_category.get(category) {
            // Category cannot use its full allocation; cap and bank the rest.
            Some(&used) if planned > used => {
                remainder += planned - used;
                shares.insert(category.clone(), used);
            }
            // Category needs at least its share.
            Some(_) => {
                shares.insert(category.clone(), planned);
                needy.push(category.clone());
            }
            // No items: the whole share is surplus.
            None => remainder += planned,
        }
    }

    distribute_remainder(remainder, usage, shares, needy)
}

/// Distribute `remainder` over the needy categories.
///
/// While the remainder lasts, the smallest gap to full usage is granted to
/// *every* needy category and its owner leaves the needy set; once a single
/// even split would overshoot, the remainder is spread in one final even
/// pass (capping each category at its usage) and the loop stops. Ties on
/// the smallest gap go to the first category in the fixed iteration order.
pub fn distribute_remainder(
    mut remainder: f64,
    usage: &Estimate,
    mut shares: BTreeMap<CategoryId, f64>,
    mut needy: Vec<CategoryId>,
) -> Reconciled {
    while remainder > 0.0 && !needy.is_empty() {
        // Gap to full usage per needy category; smallest gap first, ties to
        // the earlier category.
        let (least_index, least_gap) = needy
            .iter()
            .enumerate()
            .map(|(i, c)| (i, usage.usage(c) - shares.get(c).copied().unwrap_or(0.0)))
            .min_by_key(|&(_, gap)| OrderedFloat(gap))
            .map(|(i, gap)| (i, gap.max(0.0)))
            .unwrap_or((0, 0.0));

        if needy.len() as f64 * least_gap < remainder {
            // Everyone can absorb the smallest gap; its owner is satisfied.
            for category in &needy {
                if let Some(s) = shares.get_mut(category) {
                    *s += least_gap;
                }
                remainder -= least_gap;
            }
            needy.remove(least_index);
        } else {
            // Final even pass: each category takes an even cut of what is
            // left, capped at its usage; capped cuts flow back into the
            // remainder for the categories after it.
            let mut remaining_categories = needy.len();
            for category in &needy {
                let cut = remainder / remaining_categories as f64;
                let current = shares.get(category).copied().unwrap_or(0.0);
                let ceiling = usage.usage(category);

                if current + cut < ceiling {
                    shares.insert(category.clone(), current + cut);
                    remainder -= cut;
                } else {
                    shares.insert(category.clone(), ceiling);
                    remainder -= ceiling - current;
                }
                remaining_categories -= 1;
            }
            break;
        }
    }

    if remainder > 0.0 && needy.is_empty() {
        // No recipient left; the surplus is deliberately left unspent.
        debug!(unallocated = remainder, "surplus share with no needy category");
    } else {
        remainder = 0.0;
    }

    Reconciled { shares, unallocated: remainder }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shares_of(raw: &[(&str, f64)]) -> BTreeMap<CategoryId, f64> {
        raw.iter().map(|&(c, s)| (CategoryId::from(c), s)).collect()
    }

    fn usage_of(raw: &[(&str, f64)]) -> Estimate {
        let by_category: BTreeMap<CategoryId, f64> =
            raw.iter().map(|&(c, u)| (CategoryId::from(c), u)).collect();
        Estimate { total: by_category.values().sum(), by_category }
    }

    #[test]
    fn absent_category_forfeits_whole_share() {
        // x estimated at 20, y has no items, budget 18.
        let reconciled = reconcile(
            &shares_of(&[("x", 9.0), ("y", 9.0)]),
            &usage_of(&[("x", 20.0)]),
        );
        assert!((reconciled.share(&CategoryId::from("x")) - 18.0).abs() < 1e-9);
        assert_eq!(reconciled.share(&CategoryId::from("y")), 0.0);
        assert_eq!(reconciled.unallocated, 0.0);
    }

    #[test]
    fn oversubscribed_category_keeps_its_share() {
        let reconciled = reconcile(
            &shares_of(&[("a", 5.0)]),
            &usage_of(&[("a", 12.0)]),
        );
        assert_eq!(reconciled.share(&CategoryId::from("a")), 5.0);
    }

    #[test]
    fn undersubscribed_category_is_capped_at_usage() {
        let reconciled = reconcile(
            &shares_of(&[("a", 5.0), ("b", 5.0)]),
            &usage_of(&[("a", 2.0), ("b", 20.0)]),
        );
        assert_eq!(reconciled.share(&CategoryId::from("a")), 2.0);
        assert!((reconciled.share(&CategoryId::from("b")) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn surplus_with_no_needy_category_stays_unallocated() {
        let reconciled = reconcile(
            &shares_of(&[("a", 5.0), ("b", 5.0)]),
            &usage_of(&[("a", 1.0), ("b", 2.0)]),
        );
        assert_eq!(reconciled.share(&CategoryId::from("a")), 1.0);
        assert_eq!(reconciled.share(&CategoryId::from("b")), 2.0);
        assert!((reconciled.unallocated - 7.0).abs() < 1e-9);
    }

    #[test]
    fn smallest_gap_is_satisfied_first() {
        // a needs 1 more, b needs 10 more, 4 of surplus from c.
        let reconciled = reconcile(
            &shares_of(&[("a", 2.0), ("b", 2.0), ("c", 4.0)]),
            &usage_of(&[("a", 3.0), ("b", 12.0)]),
        );
        // Pass 1: both gain a's gap of 1 (surplus 4 -> 2), a leaves.
        // Final even pass: b takes the rest.
        assert!((reconciled.share(&CategoryId::from("a")) - 3.0).abs() < 1e-9);
        assert!((reconciled.share(&CategoryId::from("b")) - 5.0).abs() < 1e-9);
        assert_eq!(reconciled.share(&CategoryId::from("c")), 0.0);
    }

    #[test]
    fn even_pass_spreads_the_rest_over_remaining_needy() {
        // Gaps: a=1, b=9; surplus 8. 2*1 < 8, so a's gap goes to both
        // (surplus 6), a leaves. Even pass: b takes all 6.
        let reconciled = reconcile(
            &shares_of(&[("a", 1.0), ("b", 1.0), ("c", 8.0)]),
            &usage_of(&[("a", 2.0), ("b", 10.0)]),
        );
        assert!((reconciled.share(&CategoryId::from("a")) - 2.0).abs() < 1e-9);
        assert!((reconciled.share(&CategoryId::from("b")) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn tie_break_goes_to_first_in_order() {
        // Identical gaps; the lexicographically first category must leave
        // the needy set first and the result must stay deterministic.
        let first = reconcile(
            &shares_of(&[("a", 2.0), ("b", 2.0), ("c", 6.0)]),
            &usage_of(&[("a", 5.0), ("b", 5.0)]),
        );
        let second = reconcile(
            &shares_of(&[("a", 2.0), ("b", 2.0), ("c", 6.0)]),
            &usage_of(&[("a", 5.0), ("b", 5.0)]),
        );
        assert_eq!(first, second);
        let total: f64 = first.shares.values().sum();
        assert!((total - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_remainder_is_a_no_op() {
        let reconciled = reconcile(
            &shares_of(&[("a", 5.0)]),
            &usage_of(&[("a", 7.0)]),
        );
        assert_eq!(reconciled.share(&CategoryId::from("a")), 5.0);
        assert_eq!(reconciled.unallocated, 0.0);
    }

    proptest! {
        #[test]
        fn reconciled_share_never_exceeds_usage(
            plan in prop::collection::vec(0.0f64..=10.0, 4),
            used in prop::collection::vec((prop::bool::ANY, 0.0f64..=15.0), 4),
        ) {
            let names = ["a", "b", "c", "d"];
            let share: BTreeMap<CategoryId, f64> = names
                .iter()
                .zip(&plan)
                .map(|(&n, &s)| (CategoryId::from(n), s))
                .collect();
            let usage = usage_of(
                &names
                    .iter()
                    .zip(&used)
                    .filter(|(_, (present, _))| *present)
                    .map(|(&n, &(_, u))| (n, u))
                    .collect::<Vec<_>>(),
            );

            let reconciled = reconcile(&share, &usage);
            for (category, &s) in &reconciled.shares {
                prop_assert!(s >= -1e-9, "negative share for {category}: {s}");
                prop_assert!(
                    s <= usage.usage(category) + 1e-9,
                    "{category} granted {s} above usage {}",
                    usage.usage(category)
                );
            }
        }

        #[test]
        fn share_mass_is_conserved(
            plan in prop::collection::vec(0.0f64..=10.0, 3),
            used in prop::collection::vec(0.0f64..=15.0, 3),
        ) {
            let names = ["a", "b", "c"];
            let share: BTreeMap<CategoryId, f64> = names
                .iter()
                .zip(&plan)
                .map(|(&n, &s)| (CategoryId::from(n), s))
                .collect();
            let usage = usage_of(
                &names.iter().zip(&used).map(|(&n, &u)| (n, u)).collect::<Vec<_>>(),
            );

            let planned_total: f64 = share.values().sum();
            let reconciled = reconcile(&share, &usage);
            let final_total: f64 =
                reconciled.shares.values().sum::<f64>() + reconciled.unallocated;
            prop_assert!(
                final_total <= planned_total + 1e-9,
                "redistribution created share: {final_total} > {planned_total}"
            );
        }
    }
}
