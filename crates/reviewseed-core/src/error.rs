//! Error types for reviewseed.

use thiserror::Error;

use crate::sentiment::Sentiment;

/// One (product, sentiment) bucket that could not be filled to quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortage {
    pub product_id: String,
    pub sentiment: Sentiment,
    pub count: usize,
    pub quota: usize,
}

impl Shortage {
    /// Number of records still missing from the bucket.
    pub fn deficit(&self) -> usize {
        self.quota.saturating_sub(self.count)
    }
}

impl std::fmt::Display for Shortage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {}/{}",
            self.product_id, self.sentiment, self.count, self.quota
        )
    }
}

fn format_shortages(shortages: &[Shortage]) -> String {
    shortages
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n  ")
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not enough reviews to fill every quota:\n  {}", format_shortages(.0))]
    InsufficientRecords(Vec<Shortage>),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
