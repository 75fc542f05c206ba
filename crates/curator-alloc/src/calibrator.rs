//! Per-category scalers and the logarithmic feedback correction.

use std::collections::BTreeMap;

use tracing::debug;

use curator_core::types::CategoryId;

use crate::estimator::Estimate;
use crate::reconciler::Reconciled;

/// Initial per-category scaler: reconciled share over raw usage.
///
/// Categories with zero estimated usage have no items to scale; they are
/// simply left out of the map and their items (if any appear later) fall
/// back to the unscaled default.
pub fn initial_scalers(reconciled: &Reconciled, usage: &Estimate) -> BTreeMap<CategoryId, f64> {
    reconciled
        .shares
        .iter()
        .filter_map(|(category, &share)| {
            let used = usage.usage(category);
            (used > 0.0).then(|| (category.clone(), share / used))
        })
        .collect()
}

/// Feedback multiplier that makes the compounding consumption land on
/// `target` instead of `actual`.
///
/// A linear scale-down of vote weights does not linearly scale the total
/// consumption, because every vote removes a fraction of what is left. In
/// log space the compounding is linear, hence
/// `ln(1 - target/100) / ln(1 - actual/100)`.
///
/// Returns `None` for every degenerate input (zero usage, zero target, a
/// non-positive logarithm argument, or a vanishing denominator); the caller
/// keeps its prior scalers in that case.
pub fn log_correction(actual: f64, target: f64) -> Option<f64> {
    if actual == 0.0 || target == 0.0 {
        debug!(actual, target, "calibration skipped: zero usage or target");
        return None;
    }

    let desired = 1.0 - target / 100.0;
    let observed = 1.0 - actual / 100.0;
    if desired <= 0.0 || observed <= 0.0 {
        debug!(actual, target, "calibration skipped: non-positive log argument");
        return None;
    }

    let denominator = observed.ln();
    if denominator == 0.0 {
        debug!(actual, target, "calibration skipped: zero denominator");
        return None;
    }

    Some(desired.ln() / denominator)
}

/// Multiply every scaler by the correction factor.
pub fn apply_correction(scalers: &mut BTreeMap<CategoryId, f64>, correction: f64) {
    for scaler in scalers.values_mut() {
        *scaler *= correction;
    }
}
