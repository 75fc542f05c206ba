//! Core data types for a curation run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CategoryError;

/// Identifier of a content category (e.g. `"development"`, `"tutorials"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Static per-category configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryParams {
    /// Relative weight controlling the category's share of the contribution budget.
    pub priority_weight: f64,
    /// Payout-unit price of one review comment in this category.
    pub reward_points: f64,
}

/// The closed category enumeration plus a designated fallback.
///
/// Items carrying a category outside the set resolve to the fallback via
/// [`resolve`](Self::resolve) — an explicit default-on-miss policy instead
/// of exception-driven lookup. The `BTreeMap` gives the fixed, deterministic
/// category ordering that remainder redistribution relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySet {
    categories: BTreeMap<CategoryId, CategoryParams>,
    fallback: CategoryId,
}

impl CategorySet {
    /// Build a set from `(id, params)` pairs and a fallback id.
    ///
    /// The fallback must be a member of the set, and every priority weight
    /// must be a finite non-negative number.
    pub fn new(
        categories: impl IntoIterator<Item = (CategoryId, CategoryParams)>,
        fallback: CategoryId,
    ) -> Result<Self, CategoryError> {
        let categories: BTreeMap<_, _> = categories.into_iter().collect();

        for (id, params) in &categories {
            if !params.priority_weight.is_finite() || params.priority_weight < 0.0 {
                return Err(CategoryError::InvalidPriorityWeight {
                    category: id.clone(),
                    weight: params.priority_weight,
                });
            }
            if !params.reward_points.is_finite() || params.reward_points < 0.0 {
                return Err(CategoryError::InvalidRewardPoints {
                    category: id.clone(),
                    points: params.reward_points,
                });
            }
        }

        if !categories.contains_key(&fallback) {
            return Err(CategoryError::UnknownFallback(fallback));
        }

        Ok(Self { categories, fallback })
    }

    /// Resolve an item's category to a member of the set.
    ///
    /// Unknown categories map to the fallback; this is not an error.
    pub fn resolve<'a>(&'a self, category: &'a CategoryId) -> &'a CategoryId {
        if self.categories.contains_key(category) {
            category
        } else {
            &self.fallback
        }
    }

    /// Parameters for a member category, or the fallback's on a miss.
    pub fn params(&self, category: &CategoryId) -> &CategoryParams {
        self.categories
            .get(self.resolve(category))
            .unwrap_or_else(|| &self.categories[&self.fallback])
    }

    pub fn fallback(&self) -> &CategoryId {
        &self.fallback
    }

    pub fn contains(&self, category: &CategoryId) -> bool {
        self.categories.contains_key(category)
    }

    /// Iterate members in the fixed (lexicographic) category ordering.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &CategoryParams)> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Sum of all priority weights.
    pub fn total_priority_weight(&self) -> f64 {
        self.categories.values().map(|p| p.priority_weight).sum()
    }
}

/// A pending review comment awaiting an upvote.
///
/// Comment vote weight is derived from the category's reward points, so no
/// per-item requested weight exists here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentItem {
    /// Stable item identifier (author/permlink in the source platform).
    pub id: String,
    pub category: CategoryId,
}

/// A pending contribution awaiting an upvote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionItem {
    pub id: String,
    pub category: CategoryId,
    /// Vote weight the item would consume before scaling, 0–100.
    pub requested_weight: f64,
    /// Review score; the queue collaborator pre-sorts by it, descending.
    #[serde(default)]
    pub score: f64,
    /// Marked as a staff pick during review. The allocator prices staff
    /// picks like any other item; the flag is carried through for ledger
    /// and submission consumers.
    #[serde(default)]
    pub staff_picked: bool,
}

/// Final allocation decision for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub item_id: String,
    /// Vote weight to submit, 0–100.
    pub granted_weight: f64,
    /// False when the conservative unscaled fallback applied (no scaler
    /// derived for the item's category).
    pub scaled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(ids: &[&str], fallback: &str) -> CategorySet {
        CategorySet::new(
            ids.iter().map(|&id| {
                (
                    CategoryId::from(id),
                    CategoryParams { priority_weight: 10.0, reward_points: 5.0 },
                )
            }),
            CategoryId::from(fallback),
        )
        .unwrap()
    }

    #[test]
    fn resolve_member_is_identity() {
        let set = set_of(&["a", "b"], "a");
        let b = CategoryId::from("b");
        assert_eq!(set.resolve(&b), &b);
    }

    #[test]
    fn resolve_unknown_hits_fallback() {
        let set = set_of(&["a", "b"], "a");
        let odd = CategoryId::from("nonsense");
        assert_eq!(set.resolve(&odd).as_str(), "a");
    }

    #[test]
    fn params_follow_resolution() {
        let set = CategorySet::new(
            [
                (
                    CategoryId::from("a"),
                    CategoryParams { priority_weight: 10.0, reward_points: 2.5 },
                ),
                (
                    CategoryId::from("b"),
                    CategoryParams { priority_weight: 20.0, reward_points: 7.0 },
                ),
            ],
            CategoryId::from("a"),
        )
        .unwrap();

        assert_eq!(set.params(&CategoryId::from("b")).reward_points, 7.0);
        assert_eq!(set.params(&CategoryId::from("missing")).reward_points, 2.5);
    }

    #[test]
    fn fallback_must_be_member() {
        let err = CategorySet::new(
            [(
                CategoryId::from("a"),
                CategoryParams { priority_weight: 1.0, reward_points: 1.0 },
            )],
            CategoryId::from("elsewhere"),
        )
        .unwrap_err();
        assert!(matches!(err, CategoryError::UnknownFallback(_)));
    }

    #[test]
    fn negative_priority_weight_rejected() {
        let err = CategorySet::new(
            [(
                CategoryId::from("a"),
                CategoryParams { priority_weight: -1.0, reward_points: 1.0 },
            )],
            CategoryId::from("a"),
        )
        .unwrap_err();
        assert!(matches!(err, CategoryError::InvalidPriorityWeight { .. }));
    }

    #[test]
    fn iteration_order_is_sorted() {
        let set = set_of(&["c", "a", "b"], "a");
        let ids: Vec<&str> = set.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn total_priority_weight_sums() {
        let set = set_of(&["a", "b", "c"], "a");
        assert_eq!(set.total_priority_weight(), 30.0);
    }

    #[test]
    fn contribution_item_deserializes_with_defaults() {
        let item: ContributionItem = serde_json::from_str(
            r#"{"id": "alice/post", "category": "development", "requested_weight": 40.0}"#,
        )
        .unwrap();
        assert_eq!(item.score, 0.0);
        assert!(!item.staff_picked);
    }

    #[test]
    fn category_id_serde_is_transparent() {
        let id: CategoryId = serde_json::from_str("\"blog\"").unwrap();
        assert_eq!(id.as_str(), "blog");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"blog\"");
    }
}
