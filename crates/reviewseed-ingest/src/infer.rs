//! Guess a display name and category for a product from its reviews.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use reviewseed_core::{CategoryRule, FALLBACK_CATEGORY};
use reviewseed_store::ReviewDocument;

/// Name returned when there is nothing to infer from.
pub const FALLBACK_NAME: &str = "商品";
const FALLBACK_NAME_MAX_CHARS: usize = 15;

/// "<name>を購入", "<name>が届いた", "<name>の感想" and similar phrases.
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"([^。、\s]{2,15}?)(を|が|の)(購入|届いた|使った|使用|試した)",
        r"([^。、\s]{2,15}?)(の)(レビュー|感想|評価)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name pattern is valid"))
    .collect()
});

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[。！？!?\n]").expect("sentence pattern is valid"));

/// Most frequent noun phrase preceding a purchase/usage verb or a
/// "review/impression" word. Ties go to the phrase seen first.
///
/// Falls back to the first 15 characters of the first review's first
/// sentence, then to `商品` when there are no reviews.
pub fn infer_product_name(reviews: &[ReviewDocument]) -> String {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for review in reviews {
        for pattern in NAME_PATTERNS.iter() {
            for cap in pattern.captures_iter(&review.content) {
                if let Some(m) = cap.get(1) {
                    *counts.entry(m.as_str()).or_insert(0) += 1;
                }
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (&phrase, &count) in &counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((phrase, count));
        }
    }
    if let Some((phrase, _)) = best {
        return phrase.to_string();
    }

    match reviews.first() {
        Some(first) => {
            let sentence = SENTENCE_BREAK
                .split(&first.content)
                .next()
                .unwrap_or("");
            sentence
                .chars()
                .take(FALLBACK_NAME_MAX_CHARS)
                .collect::<String>()
                .trim()
                .to_string()
        }
        None => FALLBACK_NAME.to_string(),
    }
}

/// Category whose keywords appear most in the combined review text.
///
/// A rule scores one point per distinct keyword present. Returns
/// [`FALLBACK_CATEGORY`] when every rule scores zero.
pub fn infer_category(reviews: &[ReviewDocument], rules: &[CategoryRule]) -> String {
    let text = reviews
        .iter()
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut best: Option<(&str, usize)> = None;
    for rule in rules {
        let score = rule
            .keywords
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .count();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((rule.name.as_str(), score));
        }
    }

    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reviewseed_core::{Catalog, Sentiment};

    fn review(content: &str) -> ReviewDocument {
        let now = Utc::now();
        ReviewDocument {
            review_id: "r".into(),
            product_id: "prod-001".into(),
            product_slug: "s".into(),
            dataset_id: "d".into(),
            dataset_label: 4,
            dataset_split: "train".into(),
            sentiment: Sentiment::Positive,
            rating: 5,
            title: String::new(),
            content: content.to_string(),
            user_id: String::new(),
            user_name: String::new(),
            user_avatar: String::new(),
            verified_purchase: true,
            helpful_votes: 0,
            total_votes: 0,
            created_at: now,
            updated_at: now,
            language: "ja".into(),
            sentences: Vec::new(),
        }
    }

    #[test]
    fn test_name_most_frequent_phrase() {
        let reviews = vec![
            review("このイヤホンを購入しました。"),
            review("充電器が届いた。イヤホンを使った感じは良い。"),
            review("イヤホンを購入した。"),
        ];
        // "このイヤホン" and "イヤホン" are counted separately; "イヤホン" appears twice
        assert_eq!(infer_product_name(&reviews), "イヤホン");
    }

    #[test]
    fn test_name_tie_keeps_first_seen() {
        let reviews = vec![review("時計を購入。"), review("財布の感想です。")];
        assert_eq!(infer_product_name(&reviews), "時計");
    }

    #[test]
    fn test_name_fallbacks() {
        let reviews = vec![review("とても良かったです、また頼みたいと思います。二文目")];
        assert_eq!(infer_product_name(&reviews), "とても良かったです、また頼みた");
        assert_eq!(infer_product_name(&[]), FALLBACK_NAME);
    }

    #[test]
    fn test_category_scores() {
        let catalog = Catalog::default();
        let reviews = vec![
            review("キーボードとマウスをUSBでつないだ"),
            review("充電が長持ち"),
        ];
        assert_eq!(infer_category(&reviews, &catalog.categories), "パソコン・周辺機器");
    }

    #[test]
    fn test_category_tie_and_fallback() {
        let catalog = Catalog::default();
        // one keyword each for the first two rules
        let reviews = vec![review("カメラとマウス")];
        assert_eq!(infer_category(&reviews, &catalog.categories), "家電・カメラ");
        let reviews = vec![review("特に言うことはない")];
        assert_eq!(infer_category(&reviews, &catalog.categories), FALLBACK_CATEGORY);
    }
}
