//! Review-queue clients: HTTP batch endpoints and a local file mode.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use curator_core::error::QueueError;
use curator_core::traits::ReviewQueue;
use curator_core::types::{CommentItem, ContributionItem};

/// Sort contributions by descending review score, ties keeping their
/// incoming order. The allocator processes the batch exactly as given.
fn sort_by_score(mut contributions: Vec<ContributionItem>) -> Vec<ContributionItem> {
    contributions.sort_by(|a, b| b.score.total_cmp(&a.score));
    contributions
}

/// Queue client fetching JSON batches over HTTP.
pub struct HttpReviewQueue {
    client: Client,
    comment_url: String,
    contribution_url: String,
}

impl HttpReviewQueue {
    pub fn new(comment_url: &str, contribution_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("build reqwest client"),
            comment_url: comment_url.to_owned(),
            contribution_url: contribution_url.to_owned(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, QueueError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QueueError::Transport(format!(
                "{url} returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| QueueError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ReviewQueue for HttpReviewQueue {
    async fn pending_comments(&self) -> Result<Vec<CommentItem>, QueueError> {
        self.fetch(&self.comment_url).await
    }

    async fn pending_contributions(&self) -> Result<Vec<ContributionItem>, QueueError> {
        Ok(sort_by_score(self.fetch(&self.contribution_url).await?))
    }
}

/// Queue reading the same JSON shapes from a local directory
/// (`comments.json` and `contributions.json`); missing files mean empty
/// batches. Intended for local and dry runs.
pub struct FileReviewQueue {
    dir: PathBuf,
}

impl FileReviewQueue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, QueueError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|e| QueueError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ReviewQueue for FileReviewQueue {
    async fn pending_comments(&self) -> Result<Vec<CommentItem>, QueueError> {
        self.read("comments.json")
    }

    async fn pending_contributions(&self) -> Result<Vec<ContributionItem>, QueueError> {
        Ok(sort_by_score(self.read("contributions.json")?))
    }
}
