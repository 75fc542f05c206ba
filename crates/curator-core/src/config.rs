//! Run configuration for the allocator.
//!
//! Provides [`RunConfig`] with defaults from [`constants`](crate::constants).
//! The configuration is constructed once per run and passed by reference into
//! the allocator and its collaborators; there is no ambient global state.

use crate::constants::{
    DECAY_RATE, DEFAULT_COMMENT_CEILING, DEFAULT_TOTAL_CEILING, DEFAULT_VOTE_VALUE,
    POOL_CAPACITY, default_categories,
};
use crate::error::ConfigError;
use crate::types::CategorySet;

/// Configuration for one allocation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Ceiling on total voting-power consumption, in percent of the pool.
    pub total_ceiling: f64,
    /// Ceiling on the review-comment sub-budget, in percent of the pool.
    pub comment_ceiling: f64,
    /// Fraction of the remaining pool one full-weight vote consumes.
    pub decay_rate: f64,
    /// Payout value of a full-weight vote; prices comment reward points.
    pub vote_value: f64,
    /// The closed category enumeration with its fallback.
    pub categories: CategorySet,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_ceiling: DEFAULT_TOTAL_CEILING,
            comment_ceiling: DEFAULT_COMMENT_CEILING,
            decay_rate: DECAY_RATE,
            vote_value: DEFAULT_VOTE_VALUE,
            categories: default_categories(),
        }
    }
}

impl RunConfig {
    /// Check the numeric invariants the allocator assumes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("total_ceiling", self.total_ceiling),
            ("comment_ceiling", self.comment_ceiling),
        ] {
            if !value.is_finite() || value <= 0.0 || value >= POOL_CAPACITY {
                return Err(ConfigError::CeilingOutOfRange { name, value });
            }
        }
        if self.comment_ceiling > self.total_ceiling {
            return Err(ConfigError::CommentCeilingExceedsTotal {
                comment: self.comment_ceiling,
                total: self.total_ceiling,
            });
        }
        if !self.decay_rate.is_finite() || self.decay_rate <= 0.0 || self.decay_rate >= 1.0 {
            return Err(ConfigError::DecayRateOutOfRange(self.decay_rate));
        }
        if !self.vote_value.is_finite() || self.vote_value <= 0.0 {
            return Err(ConfigError::NonPositiveVoteValue(self.vote_value));
        }
        Ok(())
    }

    /// Budget left for contributions after the comment phase used `comment_usage`.
    pub fn residual_ceiling(&self, comment_usage: f64) -> f64 {
        (self.total_ceiling - comment_usage).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn default_ceilings() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.total_ceiling, DEFAULT_TOTAL_CEILING);
        assert_eq!(cfg.comment_ceiling, DEFAULT_COMMENT_CEILING);
    }

    #[test]
    fn rejects_comment_ceiling_above_total() {
        let cfg = RunConfig {
            comment_ceiling: 20.0,
            total_ceiling: 18.0,
            ..RunConfig::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::CommentCeilingExceedsTotal { .. }
        ));
    }

    #[test]
    fn rejects_ceiling_at_capacity() {
        let cfg = RunConfig { total_ceiling: 100.0, ..RunConfig::default() };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::CeilingOutOfRange { name: "total_ceiling", .. }
        ));
    }

    #[test]
    fn rejects_bad_decay_rate() {
        let cfg = RunConfig { decay_rate: 1.5, ..RunConfig::default() };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::DecayRateOutOfRange(_)
        ));
    }

    #[test]
    fn rejects_zero_vote_value() {
        let cfg = RunConfig { vote_value: 0.0, ..RunConfig::default() };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::NonPositiveVoteValue(_)
        ));
    }

    #[test]
    fn residual_ceiling_subtracts_comment_usage() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.residual_ceiling(3.0), cfg.total_ceiling - 3.0);
    }

    #[test]
    fn residual_ceiling_clamps_at_zero() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.residual_ceiling(cfg.total_ceiling + 5.0), 0.0);
    }
}
