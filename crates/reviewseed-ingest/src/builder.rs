//! Synthesis of review and product documents from sampled records.
//!
//! Everything random (timestamps, votes, purchase flag, price jitter) is drawn
//! from the caller's RNG, so a seeded run is reproducible apart from `now`.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::dataset::RawRecord;
use crate::infer::{infer_category, infer_product_name, FALLBACK_NAME};
use crate::segment::{create_title, sentence_entities, split_into_sentences};
use reviewseed_core::{Catalog, Error, ProductConfig, Result, Sentiment, FALLBACK_CATEGORY};
use reviewseed_store::{ProductDocument, ReviewDocument};

const MAX_BACKDATE_DAYS: i64 = 365;
const MAX_BACKDATE_MINUTES: i64 = 23 * 60 + 59;
const MAX_TOTAL_VOTES: u32 = 120;
const VERIFIED_PURCHASE_RATE: f64 = 0.85;

const DESCRIPTION_REVIEWS: usize = 5;
const DESCRIPTION_MAX_CHARS: usize = 220;

const MIN_PRICE: i64 = 500;
const MAX_PRICE: i64 = 50_000;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Build the review document for one sampled record.
///
/// `index` is the 1-based position of the review within its product and
/// becomes part of the review id.
pub fn build_review<R: Rng + ?Sized>(
    record: &RawRecord,
    product: &ProductConfig,
    index: usize,
    sentiment: Sentiment,
    rng: &mut R,
    now: DateTime<Utc>,
) -> ReviewDocument {
    let rating = record.label.saturating_add(1).clamp(1, 5) as u8;
    let review_id = format!("{}-rev-{:04}", product.id, index);

    let created_at = now
        - Duration::days(rng.gen_range(0..=MAX_BACKDATE_DAYS))
        - Duration::minutes(rng.gen_range(0..=MAX_BACKDATE_MINUTES));

    let total_votes = rng.gen_range(0..=MAX_TOTAL_VOTES);
    let helpful_votes = if total_votes == 0 {
        0
    } else {
        match sentiment {
            Sentiment::Positive => rng.gen_range(total_votes / 2..=total_votes),
            Sentiment::Negative => rng.gen_range(0..=total_votes / 2),
        }
    };

    let sentences = split_into_sentences(&record.text);

    ReviewDocument {
        review_id: review_id.clone(),
        product_id: product.id.clone(),
        product_slug: product.slug.clone(),
        dataset_id: record.id.clone(),
        dataset_label: record.label,
        dataset_split: record.split.clone(),
        sentiment,
        rating,
        title: create_title(&record.text),
        content: record.text.clone(),
        user_id: format!("user-{}", review_id),
        user_name: format!("ユーザー{:04}", index),
        user_avatar: format!("https://i.pravatar.cc/150?u={}", review_id),
        verified_purchase: rng.gen::<f64>() < VERIFIED_PURCHASE_RATE,
        helpful_votes,
        total_votes,
        created_at,
        updated_at: created_at,
        language: "ja".to_string(),
        sentences: sentence_entities(&review_id, &sentences),
    }
}

/// Collapse runs of whitespace and cut to `max_chars`, appending `…` when cut.
pub fn summarize_text(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let collapsed = collapsed.trim();
    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", collapsed[..cut].trim_end()),
        None => collapsed.to_string(),
    }
}

/// Price tier from the average rating, plus jitter, clamped to a sane range.
fn synthesize_price<R: Rng + ?Sized>(average_rating: f64, rng: &mut R) -> i64 {
    let base = if average_rating >= 4.0 {
        3000
    } else if average_rating >= 3.0 {
        2000
    } else {
        1500
    };
    let jitter = rng.gen_range(-500..=2000);
    (base + jitter).clamp(MIN_PRICE, MAX_PRICE)
}

/// Aggregate a product document from its reviews.
///
/// Fails if `reviews` is empty.
pub fn build_product<R: Rng + ?Sized>(
    product: &ProductConfig,
    reviews: &[ReviewDocument],
    catalog: &Catalog,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<ProductDocument> {
    if reviews.is_empty() {
        return Err(Error::Internal(format!(
            "cannot build product {} without reviews",
            product.id
        )));
    }

    let rating_sum: f64 = reviews.iter().map(|r| f64::from(r.rating)).sum();
    let average_rating = (rating_sum / reviews.len() as f64 * 100.0).round() / 100.0;

    let inferred_name = infer_product_name(reviews);
    let name = if inferred_name.is_empty() || inferred_name == FALLBACK_NAME {
        let representative = reviews
            .iter()
            .find(|r| r.sentiment == Sentiment::Positive)
            .unwrap_or(&reviews[0]);
        create_title(&representative.content)
    } else {
        inferred_name
    };

    let inferred_category = infer_category(reviews, &catalog.categories);
    let category = if inferred_category == FALLBACK_CATEGORY {
        product.category.clone()
    } else {
        inferred_category
    };

    let leading_text = reviews
        .iter()
        .take(DESCRIPTION_REVIEWS)
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let description = summarize_text(&leading_text, DESCRIPTION_MAX_CHARS);

    Ok(ProductDocument {
        product_id: product.id.clone(),
        slug: product.slug.clone(),
        name,
        category,
        image: product.image.clone(),
        price: synthesize_price(average_rating, rng),
        description,
        average_rating,
        total_reviews: reviews.len(),
        created_at: now,
        updated_at: now,
    })
}
