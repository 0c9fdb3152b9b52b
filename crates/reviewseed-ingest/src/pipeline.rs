//! Turns sampled buckets into the product and review documents of one run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

use crate::builder::{build_product, build_review};
use crate::sampler::SampledBuckets;
use reviewseed_core::{Catalog, Result, Sentiment};
use reviewseed_store::{ProductDocument, ReviewDocument};

/// Documents ready to load.
#[derive(Debug, Clone, Default)]
pub struct SeedBatch {
    /// One document per product that received reviews, in catalog order.
    pub products: Vec<ProductDocument>,
    /// Reviews keyed by product id.
    pub reviews: HashMap<String, Vec<ReviewDocument>>,
}

impl SeedBatch {
    /// `(name, total, positive, negative)` per catalog product, for run summaries.
    pub fn summary(&self, catalog: &Catalog) -> Vec<(String, usize, usize, usize)> {
        catalog
            .products
            .iter()
            .map(|config| {
                let reviews = self
                    .reviews
                    .get(&config.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let positive = reviews
                    .iter()
                    .filter(|r| r.sentiment == Sentiment::Positive)
                    .count();
                let name = self
                    .products
                    .iter()
                    .find(|p| p.product_id == config.id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| config.slug.clone());
                (name, reviews.len(), positive, reviews.len() - positive)
            })
            .collect()
    }
}

/// Build every review (numbered per product, positives first) and then each
/// product's aggregate document.
pub fn build_batch<R: Rng + ?Sized>(
    catalog: &Catalog,
    buckets: &SampledBuckets,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<SeedBatch> {
    let mut batch = SeedBatch::default();

    for product in &catalog.products {
        let mut reviews = Vec::new();
        for &sentiment in Sentiment::all() {
            for record in buckets.records(&product.id, sentiment) {
                let index = reviews.len() + 1;
                reviews.push(build_review(record, product, index, sentiment, rng, now));
            }
        }
        batch.reviews.insert(product.id.clone(), reviews);
    }

    for product in &catalog.products {
        let reviews = match batch.reviews.get(&product.id) {
            Some(r) if !r.is_empty() => r,
            _ => continue,
        };
        batch
            .products
            .push(build_product(product, reviews, catalog, rng, now)?);
    }

    info!(
        "Built {} products and {} reviews",
        batch.products.len(),
        batch.reviews.values().map(Vec::len).sum::<usize>()
    );
    Ok(batch)
}
