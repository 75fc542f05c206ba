//! Vote submission and outcome persistence.
//!
//! Failures here are reported and recorded, never retried: a grant whose
//! submission fails keeps its share consumed for the run's bookkeeping.
//! That asymmetry (no budget refund on external failure) reproduces the
//! long-standing behavior of the service this bot replaces; treat it as an
//! open design question, not an invariant worth defending.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use curator_core::error::{LedgerError, SubmitError};
use curator_core::traits::{ItemKind, OutcomeLedger, RewardSubmitter, VoteOutcome};

#[derive(Serialize)]
struct VoteRequest<'a> {
    item_id: &'a str,
    weight: f64,
}

#[derive(Serialize)]
struct ReplyRequest<'a> {
    item_id: &'a str,
}

/// Submitter posting votes and confirmation replies to the curation
/// service.
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("build reqwest client"),
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        }
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T, item_id: &str) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::CONFLICT => {
                Err(SubmitError::AlreadyVoted(item_id.to_owned()))
            }
            status => {
                let reason = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                Err(SubmitError::Rejected { item_id: item_id.to_owned(), reason })
            }
        }
    }
}

#[async_trait]
impl RewardSubmitter for HttpSubmitter {
    async fn submit_vote(&self, item_id: &str, weight: f64) -> Result<(), SubmitError> {
        self.post("vote", &VoteRequest { item_id, weight }, item_id)
            .await
    }

    async fn confirm(&self, item_id: &str) -> Result<(), SubmitError> {
        self.post("reply", &ReplyRequest { item_id }, item_id).await
    }
}

/// Submitter that only logs what it would do.
pub struct DryRunSubmitter;

#[async_trait]
impl RewardSubmitter for DryRunSubmitter {
    async fn submit_vote(&self, item_id: &str, weight: f64) -> Result<(), SubmitError> {
        info!(item_id, weight = format_args!("{weight:.2}%"), "dry run: would vote");
        Ok(())
    }

    async fn confirm(&self, item_id: &str) -> Result<(), SubmitError> {
        info!(item_id, "dry run: would reply");
        Ok(())
    }
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    item_id: &'a str,
    kind: &'static str,
    outcome: &'static str,
    recorded_at: chrono::DateTime<Utc>,
}

/// Append-only outcome ledger, one JSON record per line.
pub struct JsonlLedger {
    path: PathBuf,
}

impl JsonlLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl OutcomeLedger for JsonlLedger {
    async fn record(
        &self,
        item_id: &str,
        kind: ItemKind,
        outcome: VoteOutcome,
    ) -> Result<(), LedgerError> {
        let record = OutcomeRecord {
            item_id,
            kind: match kind {
                ItemKind::Contribution => "contribution",
                ItemKind::Comment => "comment",
            },
            outcome: match outcome {
                VoteOutcome::Voted => "voted",
                VoteOutcome::Failed => "failed",
                VoteOutcome::Skipped => "skipped",
            },
            recorded_at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(&record)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
