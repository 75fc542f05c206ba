//! # curator-core
//! Foundation types, configuration, and collaborator contracts for Curator.

pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use config::RunConfig;
pub use types::{CategoryId, CategoryParams, CategorySet, CommentItem, ContributionItem, Grant};
