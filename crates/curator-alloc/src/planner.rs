//! Nominal budget planning from static category configuration.

use std::collections::BTreeMap;

use curator_core::types::{CategoryId, CategorySet};

/// Split `total_budget` across categories in proportion to their priority
/// weights.
///
/// Pure arithmetic, no simulation: every category with a non-zero weight
/// receives a non-zero share. A set whose weights sum to zero yields an
/// all-zero plan.
pub fn plan_share(total_budget: f64, categories: &CategorySet) -> BTreeMap<CategoryId, f64> {
    let total_weight = categories.total_priority_weight();

    categories
        .iter()
        .map(|(id, params)| {
            let share = if total_weight > 0.0 {
                params.priority_weight / total_weight * total_budget
            } else {
                0.0
            };
            (id.clone(), share)
        })
        .collect()
}

/// Vote weight needed to pay each category's review reward in one comment
/// upvote: `100 * reward_points / vote_value`.
///
/// `vote_value` is the payout of a full-weight vote; callers validate it is
/// positive before a run starts.
pub fn comment_weights(categories: &CategorySet, vote_value: f64) -> BTreeMap<CategoryId, f64> {
    categories
        .iter()
        .map(|(id, params)| (id.clone(), 100.0 * params.reward_points / vote_value))
        .collect()
}
