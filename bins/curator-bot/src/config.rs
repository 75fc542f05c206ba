//! Bot configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use curator_core::constants::{
    DEFAULT_COMMENT_CEILING, DEFAULT_TOTAL_CEILING, DEFAULT_VOTE_VALUE, POOL_CAPACITY,
};

#[derive(Clone, Debug)]
pub struct Config {
    /// Endpoint serving the pending review-comment batch.
    pub comment_batch_url: Option<String>,
    /// Endpoint serving the pending contribution batch.
    pub contribution_batch_url: Option<String>,
    /// Endpoint accepting vote submissions and confirmation replies.
    pub submit_endpoint: Option<String>,
    /// Directory for the grant store and the outcome ledger.
    pub state_dir: PathBuf,
    /// Payout value of a full-weight vote, in payout units.
    pub vote_value: f64,
    /// Current voting power of the bot account, 0–100. A run starts only
    /// when the gauge is fully recharged.
    pub voting_power: f64,
    /// Ceiling on total voting-power consumption per run, in percent.
    pub total_ceiling: f64,
    /// Ceiling on the review-comment sub-budget, in percent.
    pub comment_ceiling: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let state_dir = std::env::var("CURATOR_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("curator")
            });

        let vote_value: f64 = std::env::var("CURATOR_VOTE_VALUE")
            .unwrap_or_else(|_| DEFAULT_VOTE_VALUE.to_string())
            .parse()
            .context("CURATOR_VOTE_VALUE must be a number")?;

        let total_ceiling: f64 = std::env::var("CURATOR_TOTAL_CEILING")
            .unwrap_or_else(|_| DEFAULT_TOTAL_CEILING.to_string())
            .parse()
            .context("CURATOR_TOTAL_CEILING must be a number")?;

        let comment_ceiling: f64 = std::env::var("CURATOR_COMMENT_CEILING")
            .unwrap_or_else(|_| DEFAULT_COMMENT_CEILING.to_string())
            .parse()
            .context("CURATOR_COMMENT_CEILING must be a number")?;

        let voting_power: f64 = std::env::var("CURATOR_VOTING_POWER")
            .unwrap_or_else(|_| POOL_CAPACITY.to_string())
            .parse()
            .context("CURATOR_VOTING_POWER must be a number")?;

        Ok(Config {
            comment_batch_url: std::env::var("CURATOR_COMMENT_BATCH_URL").ok(),
            contribution_batch_url: std::env::var("CURATOR_CONTRIBUTION_BATCH_URL").ok(),
            submit_endpoint: std::env::var("CURATOR_SUBMIT_ENDPOINT").ok(),
            state_dir,
            vote_value,
            voting_power,
            total_ceiling,
            comment_ceiling,
        })
    }

    /// Path to the granted-item store file.
    pub fn store_path(&self) -> PathBuf {
        self.state_dir.join("granted.json")
    }

    /// Path to the append-only outcome ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.state_dir.join("outcomes.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_ledger_live_under_state_dir() {
        let cfg = Config {
            comment_batch_url: None,
            contribution_batch_url: None,
            submit_endpoint: None,
            state_dir: PathBuf::from("/tmp/curator-test"),
            vote_value: DEFAULT_VOTE_VALUE,
            voting_power: POOL_CAPACITY,
            total_ceiling: DEFAULT_TOTAL_CEILING,
            comment_ceiling: DEFAULT_COMMENT_CEILING,
        };
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/curator-test/granted.json"));
        assert_eq!(cfg.ledger_path(), PathBuf::from("/tmp/curator-test/outcomes.jsonl"));
    }
}
