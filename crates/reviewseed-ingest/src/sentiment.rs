//! Maps the dataset's 0–4 star label to a coarse sentiment.

use reviewseed_core::Sentiment;

/// `0..=1` is negative, `3..` is positive, and the neutral `2` is excluded.
pub fn classify_sentiment(label: i64) -> Option<Sentiment> {
    if label <= 1 {
        Some(Sentiment::Negative)
    } else if label >= 3 {
        Some(Sentiment::Positive)
    } else {
        None
    }
}
