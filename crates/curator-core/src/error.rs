//! Error types for Curator.
use thiserror::Error;

use crate::types::CategoryId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CategoryError {
    #[error("fallback category is not in the set: {0}")] UnknownFallback(CategoryId),
    #[error("invalid priority weight for {category}: {weight}")] InvalidPriorityWeight { category: CategoryId, weight: f64 },
    #[error("invalid reward points for {category}: {points}")] InvalidRewardPoints { category: CategoryId, points: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("ceiling out of range: {name} = {value}")] CeilingOutOfRange { name: &'static str, value: f64 },
    #[error("comment ceiling {comment} exceeds total ceiling {total}")] CommentCeilingExceedsTotal { comment: f64, total: f64 },
    #[error("decay rate out of range: {0}")] DecayRateOutOfRange(f64),
    #[error("vote value must be positive: {0}")] NonPositiveVoteValue(f64),
    #[error(transparent)] Category(#[from] CategoryError),
}

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("queue request failed: {0}")] Transport(String),
    #[error("malformed batch payload: {0}")] Malformed(String),
    #[error("io: {0}")] Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("vote rejected for {item_id}: {reason}")] Rejected { item_id: String, reason: String },
    #[error("already voted: {0}")] AlreadyVoted(String),
    #[error("submission transport failed: {0}")] Transport(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("item not found in ledger: {0}")] NotFound(String),
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("serialization: {0}")] Serialization(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("corrupt store file: {0}")] Corrupt(String),
}

#[derive(Error, Debug)]
pub enum CuratorError {
    #[error(transparent)] Category(#[from] CategoryError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Queue(#[from] QueueError),
    #[error(transparent)] Submit(#[from] SubmitError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Store(#[from] StoreError),
}
