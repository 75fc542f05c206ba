//! curator-bot — Batch-vote curation bot.
//!
//! Fetches the pending review batches, runs the calibrated budget
//! allocation, and then — strictly after the grant list is final — submits
//! votes, posts confirmation replies, and records outcomes. Allocation is
//! pure computation; every external effect lives in the sequential
//! submission phase, so a failure there never corrupts a run's decisions.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn};

use curator_alloc::{AllocationDriver, VotingPool};
use curator_core::RunConfig;
use curator_core::traits::{GrantStore, ItemKind, OutcomeLedger, ReviewQueue, RewardSubmitter, VoteOutcome};
use curator_core::types::Grant;

mod config;
mod queue;
mod store;
mod submit;

use config::Config;
use queue::{FileReviewQueue, HttpReviewQueue};
use store::JsonGrantStore;
use submit::{DryRunSubmitter, HttpSubmitter, JsonlLedger};

/// Curator batch-vote bot.
#[derive(Parser, Debug)]
#[command(
    name = "curator-bot",
    version,
    about = "Batch-vote curation bot with a calibrated, decay-aware voting budget"
)]
struct Args {
    /// Read batches from comments.json / contributions.json in this
    /// directory instead of the HTTP queue.
    #[arg(long)]
    batch_dir: Option<PathBuf>,

    /// Directory for the grant store and outcome ledger.
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Compute and print the allocation without submitting anything.
    #[arg(long)]
    dry_run: bool,

    /// Override the total consumption ceiling, in percent.
    #[arg(long)]
    total_ceiling: Option<f64>,

    /// Override the comment sub-budget ceiling, in percent.
    #[arg(long)]
    comment_ceiling: Option<f64>,

    /// Override the payout value of a full-weight vote.
    #[arg(long)]
    vote_value: Option<f64>,

    /// Current voting power of the account, 0–100.
    #[arg(long)]
    voting_power: Option<f64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json").
    #[arg(long, default_value = "text")]
    log_format: String,
}

fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level, &args.log_format);

    if let Err(e) = run(args).await {
        error!("curator-bot failed: {e:#}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(dir) = args.state_dir {
        config.state_dir = dir;
    }
    if let Some(v) = args.total_ceiling {
        config.total_ceiling = v;
    }
    if let Some(v) = args.comment_ceiling {
        config.comment_ceiling = v;
    }
    if let Some(v) = args.vote_value {
        config.vote_value = v;
    }
    if let Some(v) = args.voting_power {
        config.voting_power = v;
    }

    let run_config = RunConfig {
        total_ceiling: config.total_ceiling,
        comment_ceiling: config.comment_ceiling,
        vote_value: config.vote_value,
        ..RunConfig::default()
    };
    run_config.validate().context("Invalid run configuration")?;

    // The calibration assumes a full gauge; voting early would make every
    // estimate overshoot what the account can actually spend.
    if !power_recharged(run_config.decay_rate, config.voting_power) {
        info!(
            voting_power = format_args!("{:.2}%", config.voting_power),
            "voting power not fully recharged; skipping this run"
        );
        return Ok(());
    }

    let queue: Box<dyn ReviewQueue> = match &args.batch_dir {
        Some(dir) => Box::new(FileReviewQueue::new(dir)),
        None => {
            let (comments, contributions) = match (
                &config.comment_batch_url,
                &config.contribution_batch_url,
            ) {
                (Some(c), Some(p)) => (c.as_str(), p.as_str()),
                _ => bail!(
                    "CURATOR_COMMENT_BATCH_URL and CURATOR_CONTRIBUTION_BATCH_URL \
                     are required unless --batch-dir is given"
                ),
            };
            Box::new(HttpReviewQueue::new(comments, contributions))
        }
    };

    let mut grant_store =
        JsonGrantStore::load(config.store_path()).context("Failed to load grant store")?;

    info!("started batch vote");

    let mut comments = queue
        .pending_comments()
        .await
        .context("Failed to fetch pending comments")?;
    let mut contributions = queue
        .pending_contributions()
        .await
        .context("Failed to fetch pending contributions")?;

    // Idempotence: drop anything a previous run already granted.
    comments.retain(|c| !grant_store.already_granted(&c.id).unwrap_or(false));
    contributions.retain(|c| !grant_store.already_granted(&c.id).unwrap_or(false));

    info!(
        comments = comments.len(),
        contributions = contributions.len(),
        "fetched pending batches"
    );
    for item in contributions.iter().filter(|c| c.staff_picked) {
        info!(item_id = %item.id, "staff pick in batch");
    }

    let report = AllocationDriver::new(&run_config).run(&comments, &contributions);
    report.log_summary();

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&report)?);
        info!("dry run: no votes submitted");
        return Ok(());
    }

    let submitter: Box<dyn RewardSubmitter> = match &config.submit_endpoint {
        Some(endpoint) => Box::new(HttpSubmitter::new(endpoint)),
        None => {
            warn!("CURATOR_SUBMIT_ENDPOINT not set; running submission as dry run");
            Box::new(DryRunSubmitter)
        }
    };
    let ledger = JsonlLedger::new(config.ledger_path());

    submit_phase(
        &report.comment_grants,
        ItemKind::Comment,
        submitter.as_ref(),
        &ledger,
        &mut grant_store,
    )
    .await;
    submit_phase(
        &report.contribution_grants,
        ItemKind::Contribution,
        submitter.as_ref(),
        &ledger,
        &mut grant_store,
    )
    .await;

    grant_store.save().context("Failed to save grant store")?;
    info!("finished batch vote");
    Ok(())
}

/// Submit one phase's grants in order, recording every outcome.
///
/// A failed submission is logged and recorded as failed; the grant's share
/// stays consumed for this run's bookkeeping and is never re-derived.
async fn submit_phase(
    grants: &[Grant],
    kind: ItemKind,
    submitter: &dyn RewardSubmitter,
    ledger: &dyn OutcomeLedger,
    grant_store: &mut JsonGrantStore,
) {
    for grant in grants {
        if grant.granted_weight <= 0.0 {
            info!(item_id = %grant.item_id, "skipping zero-weight grant");
            record(ledger, &grant.item_id, kind, VoteOutcome::Skipped).await;
            continue;
        }

        match submitter.submit_vote(&grant.item_id, grant.granted_weight).await {
            Ok(()) => {
                info!(
                    item_id = %grant.item_id,
                    weight = format_args!("{:.2}%", grant.granted_weight),
                    scaled = grant.scaled,
                    "voted"
                );
                if let Err(e) = submitter.confirm(&grant.item_id).await {
                    warn!(item_id = %grant.item_id, "confirmation reply failed: {e}");
                }
                record(ledger, &grant.item_id, kind, VoteOutcome::Voted).await;
                if let Err(e) = grant_store.mark_granted(&grant.item_id) {
                    warn!(item_id = %grant.item_id, "grant store update failed: {e}");
                }
            }
            Err(curator_core::error::SubmitError::AlreadyVoted(_)) => {
                info!(item_id = %grant.item_id, "already voted; skipping");
                record(ledger, &grant.item_id, kind, VoteOutcome::Skipped).await;
                if let Err(e) = grant_store.mark_granted(&grant.item_id) {
                    warn!(item_id = %grant.item_id, "grant store update failed: {e}");
                }
            }
            Err(e) => {
                // The allocated share is not refunded on failure.
                error!(item_id = %grant.item_id, "vote submission failed: {e}");
                record(ledger, &grant.item_id, kind, VoteOutcome::Failed).await;
            }
        }
    }
}

async fn record(ledger: &dyn OutcomeLedger, item_id: &str, kind: ItemKind, outcome: VoteOutcome) {
    if let Err(e) = ledger.record(item_id, kind, outcome).await {
        warn!(item_id, "ledger update failed: {e}");
    }
}

/// A run starts only on a fully recharged gauge.
fn power_recharged(decay_rate: f64, voting_power: f64) -> bool {
    VotingPool::with_remaining(decay_rate, voting_power).is_full()
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::constants::DECAY_RATE;

    #[test]
    fn recharged_gauge_allows_a_run() {
        assert!(power_recharged(DECAY_RATE, 100.0));
    }

    #[test]
    fn partial_gauge_skips_the_run() {
        assert!(!power_recharged(DECAY_RATE, 99.9));
        assert!(!power_recharged(DECAY_RATE, 42.0));
    }

    #[test]
    fn overfull_reading_clamps_to_full() {
        assert!(power_recharged(DECAY_RATE, 120.0));
    }
}
