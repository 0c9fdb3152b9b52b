//! Keyword scoring of review text against the product catalog.

use reviewseed_core::ProductConfig;

/// Number of the product's keywords found in `text_lower` (case-insensitive).
fn keyword_score(text_lower: &str, product: &ProductConfig) -> usize {
    product
        .keywords
        .iter()
        .filter(|kw| text_lower.contains(&kw.to_lowercase()))
        .count()
}

/// Pick the product whose keywords best match `text`.
///
/// Returns `None` when no product scores above zero. On a tie the product
/// listed first wins.
pub fn match_product<'a>(text: &str, products: &'a [ProductConfig]) -> Option<&'a ProductConfig> {
    let text_lower = text.to_lowercase();
    let mut best: Option<(&ProductConfig, usize)> = None;
    for product in products {
        let score = keyword_score(&text_lower, product);
        if score == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((product, score)),
        }
    }
    best.map(|(product, _)| product)
}
