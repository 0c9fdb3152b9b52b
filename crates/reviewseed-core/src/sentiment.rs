//! Coarse review sentiment.

use serde::{Deserialize, Serialize};

/// Positive/negative polarity derived from a 0–4 dataset label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Bucket order used when sampling and numbering reviews.
    pub fn all() -> &'static [Sentiment] {
        &[Self::Positive, Self::Negative]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
