//! Artifactory AQL search client and wire types.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

/// Fixed AQL query: every jar with at least one download, projecting only
/// the fields the report needs. Server-side sort()/limit() is unreliable
/// for this query shape, so the full match set is fetched and reduced
/// locally.
const AQL_QUERY: &str = r#"items.find({
    "name": { "$match": "*.jar" },
    "$and": [
        { "stat.downloads": { "$gt": "0" } }
    ]
}).include(
    "repo", "name", "path", "stat.downloads"
)"#;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(StatusCode),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Download statistics for one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub downloads: u64,
}

/// One catalog entry. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub repo: String,
    pub path: String,
    pub name: String,
    pub stats: Vec<Stats>,
}

impl Item {
    /// Download count, read from the single-element stats block.
    pub fn downloads(&self) -> u64 {
        self.stats.first().map(|s| s.downloads).unwrap_or(0)
    }
}

/// Pagination block describing how much of the server-side set the
/// accompanying results represent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Range {
    pub start_pos: u64,
    pub end_pos: u64,
    pub total: u64,
}

/// One query's fully materialized result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub results: Vec<Item>,
    pub range: Range,
}

/// AQL search client. Issues exactly one query per run, no retries.
pub struct AqlClient {
    client: Client,
    url: String,
    api_key: String,
}

impl AqlClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            url: format!("http://{}/artifactory/api/search/aql", config.host),
            api_key: config.api_key.clone(),
        }
    }

    /// Issue the one search query of this run.
    pub async fn search(&self) -> Result<ResultSet, ClientError> {
        debug!(url = %self.url, "querying artifactory");

        let response = self
            .client
            .post(&self.url)
            .header("X-JFrog-Art-Api", &self.api_key)
            .header("Accept", "application/json")
            .header("Content-Type", "text/plain")
            .body(AQL_QUERY)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body = response.text().await?;
        let results: ResultSet = serde_json::from_str(&body)?;

        debug!(
            items = results.results.len(),
            total = results.range.total,
            "result set decoded"
        );

        Ok(results)
    }
}
