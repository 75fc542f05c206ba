//! Per-run orchestration of planning, estimation, reconciliation, and
//! calibration.

use std::collections::BTreeMap;

use tracing::{debug, info};

use curator_core::config::RunConfig;
use curator_core::types::{CategoryId, CommentItem, ContributionItem, Grant};

use crate::calibrator::{apply_correction, initial_scalers, log_correction};
use crate::estimator::{Estimate, estimate};
use crate::planner::{comment_weights, plan_share};
use crate::pool::VotingPool;
use crate::reconciler::reconcile;
use crate::report::{CategorySnapshot, RunReport};

/// Runs the full allocation for one snapshot of pending items.
///
/// The driver owns nothing mutable between runs; every derived map is
/// rebuilt from scratch, and the pool is created full. The caller guarantees
/// that no two runs execute concurrently against the same external account.
pub struct AllocationDriver<'a> {
    config: &'a RunConfig,
}

impl<'a> AllocationDriver<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Allocate the comment sub-budget, then the contribution budget, and
    /// emit final grants in input order.
    ///
    /// Comments are priced by their category's reward points and calibrated
    /// against the comment ceiling; their usage is then subtracted from the
    /// pool before contributions are calibrated against whatever is left of
    /// the total ceiling. Items whose category carries no derived scaler
    /// are granted their requested weight unscaled — a conservative
    /// default, not data loss.
    pub fn run(&self, comments: &[CommentItem], contributions: &[ContributionItem]) -> RunReport {
        let mut pool = VotingPool::new(self.config.decay_rate);

        let (comment_grants, comment_usage) = self.allocate_comments(comments, &pool);
        pool.drain(comment_usage);

        let residual = self.config.residual_ceiling(comment_usage);
        let (contribution_grants, contribution_usage, unallocated, snapshots) =
            self.allocate_contributions(contributions, &pool, residual);

        info!(
            comment_usage = format_args!("{comment_usage:.2}%"),
            contribution_usage = format_args!("{contribution_usage:.2}%"),
            remaining = format_args!("{:.2}%", pool.remaining() - contribution_usage),
            "allocation complete"
        );

        RunReport {
            comment_grants,
            contribution_grants,
            comment_usage,
            contribution_usage,
            unallocated,
            snapshots,
        }
    }

    /// Comment phase: price comments by reward points, then correct the
    /// weights once if the batch would overshoot the comment ceiling.
    fn allocate_comments(
        &self,
        comments: &[CommentItem],
        pool: &VotingPool,
    ) -> (Vec<Grant>, f64) {
        let categories = &self.config.categories;
        let mut weights = comment_weights(categories, self.config.vote_value);

        let batch = |weights: &BTreeMap<CategoryId, f64>| -> Vec<(CategoryId, f64)> {
            comments
                .iter()
                .map(|c| {
                    let resolved = categories.resolve(&c.category).clone();
                    let weight = weights.get(&resolved).copied().unwrap_or(0.0);
                    (resolved, weight)
                })
                .collect()
        };

        let mut usage = estimate(&batch(&weights), pool, categories, None).total;
        let mut corrected = false;

        if usage > self.config.comment_ceiling {
            if let Some(correction) = log_correction(usage, self.config.comment_ceiling) {
                for weight in weights.values_mut() {
                    *weight *= correction;
                }
                usage = estimate(&batch(&weights), pool, categories, None).total;
                corrected = true;
                debug!(
                    correction = format_args!("{correction:.4}"),
                    usage = format_args!("{usage:.2}%"),
                    "comment weights corrected"
                );
            }
        }

        let grants = comments
            .iter()
            .map(|c| {
                let resolved = categories.resolve(&c.category);
                Grant {
                    item_id: c.id.clone(),
                    granted_weight: weights.get(resolved).copied().unwrap_or(0.0),
                    scaled: corrected,
                }
            })
            .collect();

        (grants, usage)
    }

    /// Contribution phase: plan, estimate, reconcile, and calibrate against
    /// the residual ceiling; skip scaling entirely when the batch already
    /// fits under it.
    fn allocate_contributions(
        &self,
        contributions: &[ContributionItem],
        pool: &VotingPool,
        residual_ceiling: f64,
    ) -> (Vec<Grant>, f64, f64, BTreeMap<CategoryId, CategorySnapshot>) {
        let categories = &self.config.categories;
        let batch: Vec<(CategoryId, f64)> = contributions
            .iter()
            .map(|c| (c.category.clone(), c.requested_weight))
            .collect();

        let raw = estimate(&batch, pool, categories, None);

        let (scalers, reconciled_shares, planned, usage_total, unallocated) =
            if raw.total >= residual_ceiling {
                // Over-subscribed: every category competes for the residual
                // budget, and the compounding consumption needs the
                // logarithmic correction to land on the ceiling.
                let planned = plan_share(residual_ceiling, categories);
                let reconciled = reconcile(&planned, &raw);
                let mut scalers = initial_scalers(&reconciled, &raw);

                let actual = estimate(&batch, pool, categories, Some(&scalers)).total;
                if let Some(correction) = log_correction(actual, residual_ceiling) {
                    apply_correction(&mut scalers, correction);
                }

                let usage_total = estimate(&batch, pool, categories, Some(&scalers)).total;
                let unallocated = reconciled.unallocated;
                (scalers, reconciled.shares, planned, usage_total, unallocated)
            } else {
                // Everything fits: shares are just the usages, no scaling.
                let planned = plan_share(raw.total, categories);
                (BTreeMap::new(), raw.by_category.clone(), planned, raw.total, 0.0)
            };

        let grants = contributions
            .iter()
            .map(|c| {
                let resolved = categories.resolve(&c.category);
                match scalers.get(resolved) {
                    Some(&scaler) => Grant {
                        item_id: c.id.clone(),
                        granted_weight: c.requested_weight * scaler,
                        scaled: true,
                    },
                    None => Grant {
                        item_id: c.id.clone(),
                        granted_weight: c.requested_weight,
                        scaled: false,
                    },
                }
            })
            .collect();

        let snapshots = self.snapshots(&planned, &raw, &reconciled_shares, &scalers);
        (grants, usage_total, unallocated, snapshots)
    }

    fn snapshots(
        &self,
        planned: &BTreeMap<CategoryId, f64>,
        raw: &Estimate,
        reconciled: &BTreeMap<CategoryId, f64>,
        scalers: &BTreeMap<CategoryId, f64>,
    ) -> BTreeMap<CategoryId, CategorySnapshot> {
        self.config
            .categories
            .iter()
            .map(|(category, _)| {
                (
                    category.clone(),
                    CategorySnapshot {
                        planned: planned.get(category).copied().unwrap_or(0.0),
                        estimated: raw.usage(category),
                        reconciled: reconciled.get(category).copied().unwrap_or(0.0),
                        scaler: scalers.get(category).copied(),
                    },
                )
            })
            .collect()
    }
}
