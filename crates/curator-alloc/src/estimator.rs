//! Side-effect-free simulation of a batch's voting-power usage.

use std::collections::BTreeMap;

use curator_core::types::{CategoryId, CategorySet};

use crate::pool::VotingPool;

/// Simulated consumption of one batch at given scalers.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Total power the batch would consume, in percent of the pool.
    pub total: f64,
    /// Per-category breakdown of the same consumption.
    pub by_category: BTreeMap<CategoryId, f64>,
}

impl Estimate {
    /// Estimated usage for one category; zero when it has no items.
    pub fn usage(&self, category: &CategoryId) -> f64 {
        self.by_category.get(category).copied().unwrap_or(0.0)
    }
}

/// Simulate voting the items, in order, against a copy of `pool`.
///
/// Each item is `(category, weight)`; the category resolves through the set
/// (fallback on a miss) and the weight is multiplied by that category's
/// scaler (1.0 when absent or when `scalers` is `None`). The real pool is
/// never touched, so the estimator can run any number of times per run —
/// once to discover imbalance and once after scalers are derived.
pub fn estimate(
    items: &[(CategoryId, f64)],
    pool: &VotingPool,
    categories: &CategorySet,
    scalers: Option<&BTreeMap<CategoryId, f64>>,
) -> Estimate {
    let mut simulated = pool.clone();
    let mut by_category: BTreeMap<CategoryId, f64> = BTreeMap::new();

    for (category, weight) in items {
        let resolved = categories.resolve(category);
        let scaler = scalers
            .and_then(|s| s.get(resolved))
            .copied()
            .unwrap_or(1.0);

        let usage = simulated.consume(scaler * weight);
        *by_category.entry(resolved.clone()).or_insert(0.0) += usage;
    }

    Estimate {
        total: pool.remaining() - simulated.remaining(),
        by_category,
    }
}
