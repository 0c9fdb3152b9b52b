//! Document types for products, reviews, and review sentences.

use chrono::{DateTime, Utc};
use reviewseed_core::Sentiment;
use serde::{Deserialize, Serialize};

/// Sentence annotation kinds, in the order they appear on every sentence.
pub const ANNOTATION_TYPES: &[&str] = &["insightful", "unclear", "empathy", "helpful"];

/// Per-sentence reader annotation counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAnnotation {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

/// One sentence of a review, with zeroed annotation counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceEntity {
    pub id: String,
    pub text: String,
    pub annotations: Vec<SentenceAnnotation>,
}

impl SentenceEntity {
    pub fn new(id: String, text: String) -> Self {
        let annotations = ANNOTATION_TYPES
            .iter()
            .map(|kind| SentenceAnnotation {
                kind: kind.to_string(),
                count: 0,
            })
            .collect();
        Self {
            id,
            text,
            annotations,
        }
    }
}

/// A review document as stored in the `reviews` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDocument {
    pub review_id: String,
    pub product_id: String,
    pub product_slug: String,
    pub dataset_id: String,
    pub dataset_label: i64,
    pub dataset_split: String,
    pub sentiment: Sentiment,
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub verified_purchase: bool,
    pub helpful_votes: u32,
    pub total_votes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub language: String,
    pub sentences: Vec<SentenceEntity>,
}

/// A product document as stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub product_id: String,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub price: i64,
    pub description: String,
    pub average_rating: f64,
    pub total_reviews: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_entity_has_zeroed_annotations() {
        let s = SentenceEntity::new("prod-001-rev-0001-sentence-01".into(), "良い。".into());
        let kinds: Vec<&str> = s.annotations.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, ANNOTATION_TYPES);
        assert!(s.annotations.iter().all(|a| a.count == 0));
    }

    #[test]
    fn test_annotation_serializes_type_field() {
        let s = SentenceEntity::new("x".into(), "y".into());
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["annotations"][0]["type"], "insightful");
        assert_eq!(json["annotations"][0]["count"], 0);
    }
}
