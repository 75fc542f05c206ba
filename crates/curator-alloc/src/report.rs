//! Per-run diagnostic snapshots and the final grant list.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use curator_core::types::{CategoryId, Grant};

/// One category's journey through an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySnapshot {
    /// Nominal share from the priority-weight plan, in percent.
    pub planned: f64,
    /// Estimated usage at scaler 1.0, in percent.
    pub estimated: f64,
    /// Share after surplus redistribution, in percent.
    pub reconciled: f64,
    /// Final scaler, absent when the category had nothing to scale.
    pub scaler: Option<f64>,
}

/// Everything one allocation run decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Grants for review comments, in input order.
    pub comment_grants: Vec<Grant>,
    /// Grants for contributions, in input order.
    pub contribution_grants: Vec<Grant>,
    /// Voting power the comment phase will consume, in percent.
    pub comment_usage: f64,
    /// Voting power the contribution phase will consume, in percent.
    pub contribution_usage: f64,
    /// Planned surplus that found no recipient (left unspent).
    pub unallocated: f64,
    /// Per-category diagnostics.
    pub snapshots: BTreeMap<CategoryId, CategorySnapshot>,
}

impl RunReport {
    /// Total power the run will consume, in percent.
    pub fn total_usage(&self) -> f64 {
        self.comment_usage + self.contribution_usage
    }

    /// Emit the per-category diagnostic tables as tracing events.
    pub fn log_summary(&self) {
        for (category, snapshot) in &self.snapshots {
            info!(
                category = %category,
                planned = format_args!("{:.2}%", snapshot.planned),
                estimated = format_args!("{:.2}%", snapshot.estimated),
                reconciled = format_args!("{:.2}%", snapshot.reconciled),
                scaler = snapshot.scaler,
                "category share"
            );
        }
        info!(
            comments = format_args!("{:.2}%", self.comment_usage),
            contributions = format_args!("{:.2}%", self.contribution_usage),
            all = format_args!("{:.2}%", self.total_usage()),
            "voting power usage"
        );
        if self.unallocated > 0.0 {
            info!(
                unallocated = format_args!("{:.2}%", self.unallocated),
                "planned share left unspent"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_usage_sums_phases() {
        let report = RunReport {
            comment_grants: vec![],
            contribution_grants: vec![],
            comment_usage: 3.2,
            contribution_usage: 14.8,
            unallocated: 0.0,
            snapshots: BTreeMap::new(),
        };
        assert!((report.total_usage() - 18.0).abs() < 1e-12);
    }

    #[test]
    fn report_serializes() {
        let mut snapshots = BTreeMap::new();
        snapshots.insert(
            CategoryId::from("development"),
            CategorySnapshot { planned: 9.0, estimated: 20.0, reconciled: 18.0, scaler: Some(0.9) },
        );
        let report = RunReport {
            comment_grants: vec![],
            contribution_grants: vec![Grant {
                item_id: "alice/post".into(),
                granted_weight: 36.0,
                scaled: true,
            }],
            comment_usage: 0.0,
            contribution_usage: 17.9,
            unallocated: 0.0,
            snapshots,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("development"));
        assert!(json.contains("alice/post"));
    }
}
