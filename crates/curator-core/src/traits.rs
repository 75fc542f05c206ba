//! Trait interfaces for Curator's external collaborators.
//!
//! These traits define the contracts between the allocator and the platform
//! glue around it:
//! - [`ReviewQueue`] — source of pending review comments and contributions
//! - [`RewardSubmitter`] — submits the actual vote and confirmation reply
//! - [`OutcomeLedger`] — records per-item outcomes (spreadsheet analog)
//! - [`GrantStore`] — idempotence check for items already granted
//!
//! All of them run strictly *outside* the allocation computation: batches
//! are fetched before a run, votes and ledger writes happen after the run's
//! grant list is final, so a collaborator failure can never corrupt the
//! allocator's state.

use async_trait::async_trait;

use crate::error::{LedgerError, QueueError, StoreError, SubmitError};
use crate::types::{CommentItem, ContributionItem};

/// Whether a ledger record belongs to a contribution or a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Contribution,
    Comment,
}

/// Final outcome of the external submission for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Vote submitted successfully.
    Voted,
    /// Submission failed; the item's allocated share stays consumed for this
    /// run's bookkeeping (source behavior, deliberately preserved).
    Failed,
    /// Skipped before submission (already voted, curation disallowed, ...).
    Skipped,
}

/// Source of the pending review batches.
///
/// Implementations own the wire format; this contract only promises shapes.
/// Contributions must arrive pre-sorted by descending review score — the
/// allocator processes them in the order given.
#[async_trait]
pub trait ReviewQueue: Send + Sync {
    /// Review comments pending an upvote, in stable order.
    async fn pending_comments(&self) -> Result<Vec<CommentItem>, QueueError>;

    /// Contributions pending an upvote, sorted by descending score.
    async fn pending_contributions(&self) -> Result<Vec<ContributionItem>, QueueError>;
}

/// Submits the actual reward action on the external platform.
#[async_trait]
pub trait RewardSubmitter: Send + Sync {
    /// Cast a vote of `weight` percent on the item.
    async fn submit_vote(&self, item_id: &str, weight: f64) -> Result<(), SubmitError>;

    /// Post the confirmation reply for a voted item.
    async fn confirm(&self, item_id: &str) -> Result<(), SubmitError>;
}

/// Persists per-item outcomes after a run (spreadsheet analog).
#[async_trait]
pub trait OutcomeLedger: Send + Sync {
    async fn record(
        &self,
        item_id: &str,
        kind: ItemKind,
        outcome: VoteOutcome,
    ) -> Result<(), LedgerError>;
}

/// Local record of items already granted, consulted before a run.
///
/// A lifetime-scoped handle owned by the run's caller and passed down —
/// never a process-wide singleton.
pub trait GrantStore: Send + Sync {
    fn already_granted(&self, item_id: &str) -> Result<bool, StoreError>;

    fn mark_granted(&mut self, item_id: &str) -> Result<(), StoreError>;
}
