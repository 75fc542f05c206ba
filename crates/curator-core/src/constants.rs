//! Run constants. All gauge values are percentages of a 0–100 voting-power pool.

use crate::types::{CategoryId, CategoryParams, CategorySet};

/// Full voting-power gauge at the start of a run.
pub const POOL_CAPACITY: f64 = 100.0;

/// Fraction of the *remaining* pool consumed by one full-weight (100%) vote.
///
/// Consumption is multiplicative: a vote of weight `w` removes
/// `DECAY_RATE * w/100` of whatever is left, so identical weights cost less
/// absolute power the later they land in a run.
pub const DECAY_RATE: f64 = 0.02;

/// Default ceiling on total voting-power consumption per run, in percent.
pub const DEFAULT_TOTAL_CEILING: f64 = 18.0;

/// Default ceiling on the review-comment sub-budget, in percent.
pub const DEFAULT_COMMENT_CEILING: f64 = 3.2;

/// Default value of a full-weight vote, in payout units.
///
/// Converts a category's review reward points into an equivalent vote
/// weight: `weight = 100 * points / vote_value`. The live account value
/// should be supplied through [`RunConfig`](crate::config::RunConfig).
pub const DEFAULT_VOTE_VALUE: f64 = 20.0;

/// Category absorbing items whose own category is not in the configured set.
pub const FALLBACK_CATEGORY: &str = "task-request";

/// The default closed category enumeration.
///
/// Priority weights control each category's share of the contribution
/// budget; reward points price one review comment in payout units.
///
/// # Examples
///
/// ```
/// use curator_core::constants::{default_categories, FALLBACK_CATEGORY};
/// let set = default_categories();
/// assert!(set.contains(&FALLBACK_CATEGORY.into()));
/// assert_eq!(set.fallback().as_str(), FALLBACK_CATEGORY);
/// ```
pub fn default_categories() -> CategorySet {
    let entries: &[(&str, f64, f64)] = &[
        ("analysis", 10.0, 8.0),
        ("anti-abuse", 10.0, 6.0),
        ("blog", 10.0, 6.0),
        ("bug-hunting", 10.0, 7.0),
        ("copywriting", 10.0, 5.0),
        ("development", 10.0, 10.0),
        ("documentation", 10.0, 5.0),
        ("graphics", 10.0, 8.0),
        ("ideas", 10.0, 6.0),
        ("iamutopian", 10.0, 6.0),
        ("social", 10.0, 5.0),
        ("task-request", 10.0, 2.5),
        ("translations", 10.0, 8.0),
        ("tutorials", 10.0, 8.0),
        ("video-tutorials", 10.0, 8.0),
    ];

    let categories = entries.iter().map(|&(id, priority_weight, reward_points)| {
        (
            CategoryId::from(id),
            CategoryParams { priority_weight, reward_points },
        )
    });

    CategorySet::new(categories, CategoryId::from(FALLBACK_CATEGORY))
        .expect("fallback is a member of the default set")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_fifteen_categories() {
        assert_eq!(default_categories().len(), 15);
    }

    #[test]
    fn default_fallback_is_task_request() {
        let set = default_categories();
        assert_eq!(set.fallback().as_str(), "task-request");
    }

    #[test]
    fn default_weights_are_uniform() {
        let set = default_categories();
        for (_, params) in set.iter() {
            assert_eq!(params.priority_weight, 10.0);
        }
    }

    #[test]
    fn comment_ceiling_below_total() {
        assert!(DEFAULT_COMMENT_CEILING < DEFAULT_TOTAL_CEILING);
    }
}
